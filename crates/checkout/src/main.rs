//! Checkout demo entry point.
//!
//! Wires the services, checks out one basket and logs the resulting order
//! together with the metrics it produced.

use basket::BasketRepository;
use checkout::{CheckoutApp, CheckoutRequest, Config, LogFormat};
use chrono::{Duration, Utc};
use common::{BasketItem, CustomerBasket, Money, ProductId};
use domain::{Address, AggregateRoot, BuyerRepository, CardDetails, CardType};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

fn demo_basket(user_id: &str) -> CustomerBasket {
    CustomerBasket::new(user_id).with_item(BasketItem {
        id: "1".to_string(),
        product_id: ProductId::new("1"),
        product_name: "Jacket".to_string(),
        unit_price: Money::from_dollars(1),
        old_unit_price: Money::from_dollars(1),
        quantity: 1,
        picture_url: "1.jpg".to_string(),
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration and initialize tracing
    let config = Config::from_env()?;
    init_tracing(&config);

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Wire services
    let app = CheckoutApp::from_config(&config).await?;

    // 4. Fill a basket and check it out
    let user_id = "1";
    app.baskets().update(demo_basket(user_id)).await?;

    let request_id = app
        .checkout(CheckoutRequest {
            user_id: user_id.to_string(),
            user_name: "test".to_string(),
            address: Address::new("street", "city", "state", "country", "12345"),
            card_type: CardType::Amex,
            card: CardDetails {
                number: "1111111111111111".to_string(),
                security_number: "123".to_string(),
                holder_name: "test".to_string(),
                expiration: Utc::now() + Duration::days(365),
            },
        })
        .await?;

    // 5. Report what the saga did
    for order in app.orders().all().await {
        tracing::info!(
            %request_id,
            order_id = %order.id(),
            status = %order.status(),
            total = %order.total(),
            buyer_id = ?order.buyer_id(),
            payment_method_id = ?order.payment_method_id(),
            "order created"
        );
    }
    if let Some(buyer) = app.buyers().find(user_id).await? {
        tracing::info!(
            buyer_id = %buyer.id(),
            payment_methods = buyer.payment_methods().len(),
            "buyer verified"
        );
    }
    tracing::info!(
        basket_deleted = !app.baskets().contains(user_id).await,
        pending_integration_events = app.integration().pending_events().await?.len(),
        "checkout complete"
    );

    tracing::info!(metrics = %metrics_handle.render(), "metrics snapshot");
    Ok(())
}
