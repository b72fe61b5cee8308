//! Fixed copy and defaults shared across the application.

/// Model requested when neither the command line nor the config file names one.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// OpenAI-compatible endpoint used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Assistant turn every new session is seeded with.
pub const SEED_GREETING: &str = "Konnichiwa, Nakama! 🌟 I'm your Anime Spirit Assistant. \
Ask me anything about One Piece, DBZ, Demon Slayer, or any of your favorite series! \
My spirit is burning with knowledge! 🔥";

/// Shown in place of an assistant turn when the API returns an empty reply.
/// The transcript never gets an empty bubble.
pub const EMPTY_RESPONSE_NOTICE: &str =
    "My Spirit Bomb failed to launch! My energy is low, please try again! ☄️";

/// Banner shown when no API credential is present in the environment.
pub const MISSING_KEY_NOTICE: &str =
    "API Key is missing! Please make sure your environment is configured correctly, Nakama!";

/// Shown when the API rejects our credentials.
pub const AUTH_ERROR_NOTICE: &str = "GAHHH! My Chakra is blocked! (Invalid or missing API key) 🛑";

/// Shown when the API throttles us. Kept distinct from the authentication copy.
pub const RATE_LIMIT_NOTICE: &str =
    "Too much power! I need to rest my eyes like Kakashi. (Rate limit reached) 💤";

/// Catch-all for network failures and anything else the API throws at us.
pub const TRANSIENT_ERROR_NOTICE: &str =
    "A powerful Genjutsu blocked my response! Something went wrong in the Grand Line... 🌊";

/// Persona instruction sent as the system message on every request.
pub const SYSTEM_PROMPT: &str = "\
You are the \"Anime Spirit Assistant\", a legendary anime encyclopedia and fan. \
Your personality is high-energy, friendly, and obsessed with popular series like \
One Piece, Dragon Ball Z, Demon Slayer, Naruto, and more.

RULES:
1. Use anime catchphrases frequently (e.g., \"Kamehameha!\", \"Believe it!\", \"Dattebayo!\", \
\"I'm gonna be King of the Pirates!\", \"Set your heart ablaze!\").
2. Be extremely informative about lore, powers, and characters.
3. Use plenty of emojis (💥, ⚔️, 🍜, 🍥, 🐉, ✨).
4. Speak to the user like they are your \"Nakama\" (comrade).
5. If asked about non-anime topics, steer the conversation back to anime with a fun reference.";
