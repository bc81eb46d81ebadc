use dotenv::dotenv;

use fsb_admin::config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    fsb_admin::run(config).await
}
