use crate::{config::Config, error, server};

pub async fn serve(config: Config) {
    if let Err(e) = server::start_api_server(config).await {
        error!("Gateway stopped. Err: {}", e);
    }
}
