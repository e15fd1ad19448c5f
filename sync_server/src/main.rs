use dotenvy::dotenv;
use log::info;
use sync_server::{
    cli::handle_command_line_args,
    config::{ServerConfig, SyncConfig},
    server::run_server,
};

#[actix_web::main]
async fn main() {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if handle_command_line_args() {
        return;
    }
    let sync = match SyncConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        },
    };
    let config = ServerConfig::from_env_or_default();

    info!("🚀️ Starting server on {}:{}", config.host, config.port);
    match run_server(config, sync).await {
        Ok(_) => println!("Bye!"),
        Err(e) => eprintln!("{e}"),
    }
}
