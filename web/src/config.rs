use clap::Parser;
use task_core::Layout;

/// Runtime configuration, from flags or the environment.
#[derive(Parser, Debug, Clone)]
#[command(name = "task-web", about = "Browser front-end for the task API")]
pub struct Config {
    /// Base URL of the task REST API.
    #[arg(long, env = "TASK_API_URL", default_value = "http://localhost:5000")]
    pub api_url: String,

    /// Address to bind the front-end on.
    #[arg(long, env = "TASK_BIND", default_value = "127.0.0.1")]
    pub bind: String,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Task list markup: `cards` or `table`.
    #[arg(long, env = "TASK_LAYOUT", default_value = "cards", value_parser = parse_layout)]
    pub layout: Layout,
}

impl Config {
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

fn parse_layout(s: &str) -> Result<Layout, String> {
    s.parse()
}
