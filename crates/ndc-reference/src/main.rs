mod connector;

use connector::ReferenceConnector;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    ndc_server::start_server_from_args(ReferenceConnector).await
}
