/// Application-wide constants
/// All magic numbers and constant values should be defined here

/// Randomizer page of m.cuantarazon.com
pub const CUANTARAZON_URL: &str = "https://m.cuantarazon.com/aleatorio/";

/// Randomizer page of m.cuantocabron.com
pub const CUANTOCABRON_URL: &str = "https://m.cuantocabron.com/aleatorio";

/// Default image size budget in bytes (5 MiB)
pub const DEFAULT_MAX_MEME_SIZE: usize = 1024 * 1024 * 5;

/// Settings key holding the image size budget
pub const MAX_MEME_SIZE_KEY: &str = "max_meme_size";

/// Namespace of this plugin's settings in the shared store
pub const DEFAULT_CONFIG_SCOPE: &str = "memes_es";

/// How many random pages are tried before settling for the smallest oversized image
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Outbound request timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Redirects followed per outbound request
pub const MAX_REDIRECTS: usize = 5;

/// Sent with every outbound request, some meme sites reject obvious bots
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:60.0) Gecko/20100101 Firefox/60.0";

/// Reply filenames are this base plus the detected extension
pub const MEME_FILENAME_BASE: &str = "meme";

/// Used when no extension can be inferred
pub const DEFAULT_EXTENSION: &str = ".jpg";

/// Emoji prefix used in logs
pub const MEME_EMOJI: &str = "🖼️";
