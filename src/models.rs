use crate::constants::{CUANTARAZON_URL, CUANTOCABRON_URL};
use crate::retriever::Reply;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Cuantarazon,
    Cuantocabron,
}

impl Command {
    pub const ALL: [Command; 2] = [Command::Cuantarazon, Command::Cuantocabron];

    pub fn name(&self) -> &'static str {
        match self {
            Command::Cuantarazon => "cuantarazon",
            Command::Cuantocabron => "cuantocabron",
        }
    }

    pub fn source_url(&self) -> &'static str {
        match self {
            Command::Cuantarazon => CUANTARAZON_URL,
            Command::Cuantocabron => CUANTOCABRON_URL,
        }
    }

    /// Help text shown to chat users
    pub fn description(&self) -> &'static str {
        match self {
            Command::Cuantarazon => "Devuelve un meme al azar de https://m.cuantarazon.com",
            Command::Cuantocabron => "Devuelve un meme al azar de https://m.cuantocabron.com",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Command {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Chat users type commands with a leading slash
        match s.trim_start_matches('/') {
            "cuantarazon" => Ok(Command::Cuantarazon),
            "cuantocabron" => Ok(Command::Cuantocabron),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommandInfo {
    #[schema(example = "cuantarazon")]
    pub name: String,
    pub description: String,
    #[schema(example = "https://m.cuantarazon.com/aleatorio/")]
    pub source_url: String,
}

impl From<Command> for CommandInfo {
    fn from(command: Command) -> Self {
        Self {
            name: command.name().to_string(),
            description: command.description().to_string(),
            source_url: command.source_url().to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReplyResponse {
    /// Caption, blank line, image URL
    #[schema(example = "funny\n\nhttp://x/a.jpg")]
    pub text: String,

    #[schema(example = "meme.jpg")]
    pub filename: String,

    pub size_bytes: usize,

    /// Image bytes, standard base64
    pub content_base64: String,
}

impl From<Reply> for ReplyResponse {
    fn from(reply: Reply) -> Self {
        Self {
            size_bytes: reply.bytefile.len(),
            content_base64: BASE64.encode(&reply.bytefile),
            text: reply.text,
            filename: reply.filename,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Current image size budget in bytes
    pub max_meme_size: usize,
}
