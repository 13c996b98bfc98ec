//! Site Panel Agent - 站点管理面板代理
//!
//! Usage:
//! - Normal mode: `site-panel-agent`
//! - With custom port: `site-panel-agent --port 19999`

use site_panel_agent::RuntimeConfig;

/// 解析命令行参数
fn parse_args() -> RuntimeConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = RuntimeConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" if i + 1 < args.len() => {
                config.port_override = args[i + 1].parse().ok();
                i += 2;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                i += 1;
            }
        }
    }

    config
}

fn print_help() {
    println!("Site Panel Agent - 站点管理面板代理");
    println!();
    println!("USAGE:");
    println!("    site-panel-agent [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --port <PORT>    Override the listening port");
    println!("    -h, --help       Print help information");
    println!();
    println!("ENVIRONMENT:");
    println!("    SITE_PANEL_API_KEY   API key required in the x-api-key header");
    println!("    PORT                 Listening port (default 9880)");
    println!("    SITES_ROOT           Website root directory (default /sites)");
    println!("    ELEVATE_WITH         Privilege prefix (default \"sudo -n\", empty disables)");
    println!("    RUST_LOG             Log filter (default info)");
}

fn main() -> anyhow::Result<()> {
    // Parse runtime config from command line
    let config = parse_args();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(site_panel_agent::init_and_run_agent_with_config(config))
}
