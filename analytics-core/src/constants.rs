//! Central Configuration Constants
//!
//! Single source of truth for defaults shared by the generator CLI and the server.

/// Default dataset location, relative to the working directory
pub const DEFAULT_DATA_PATH: &str = "pnode_history.csv";

/// Default number of synthetic nodes
pub const DEFAULT_NODE_COUNT: usize = 20;

/// Default history length in days
pub const DEFAULT_HISTORY_DAYS: i64 = 30;

/// Probability that a generated sample is an anomaly
pub const DEFAULT_ANOMALY_RATE: f64 = 0.01;

/// Groq OpenAI-compatible API root
pub const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1";

/// Default chat model
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

/// Default LLM request timeout (seconds)
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

/// Maximum tool-calling rounds before the agent gives up
pub const MAX_AGENT_ROUNDS: usize = 5;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "pNode Analytics";
