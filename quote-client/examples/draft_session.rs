//! Walk a quote through the builder steps
//!
//! Uses the quote API when `QUOTE_API_URL` is set, an in-memory store otherwise.
//!
//! ```sh
//! cargo run -p quote-client --example draft_session
//! QUOTE_API_URL=http://localhost:8080 cargo run -p quote-client --example draft_session
//! ```

use std::sync::Arc;
use std::time::Duration;

use quote_client::logger::init_logger;
use quote_client::{
    BuilderStatus, ClientConfig, DraftBuilder, DraftGateway, HttpDraftGateway, Itinerary,
    MemoryDraftGateway, Passenger, SelectedVehicle, Stop, TripType,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logger();

    let config = ClientConfig::from_env();
    let gateway: Arc<dyn DraftGateway> = if std::env::var("QUOTE_API_URL").is_ok() {
        tracing::info!(base_url = %config.base_url, "Using quote API");
        Arc::new(HttpDraftGateway::from_config(&config)?)
    } else {
        tracing::info!("QUOTE_API_URL not set, using in-memory draft store");
        Arc::new(MemoryDraftGateway::new())
    };

    let resume = std::env::args().nth(1);
    let builder = DraftBuilder::open(gateway, &config, resume.as_deref()).await;
    if let BuilderStatus::Failed(reason) = builder.status() {
        anyhow::bail!("could not resume draft: {reason}");
    }

    // Step 1
    builder.set_trip_type(TripType::TwoWay);
    builder.go_to_next_step().await?;
    tracing::info!(quote_id = ?builder.quote_id(), "Draft ready");

    // Step 2
    builder.set_itinerary(Itinerary::round_trip(
        vec![
            Stop::pickup("Placa Catalunya").with_arrival("08:30"),
            Stop::intermediate("Montserrat")
                .with_arrival("09:45")
                .with_departure("13:00"),
            Stop::dropoff("Sitges"),
        ],
        vec![
            Stop::pickup("Sitges").with_arrival("18:00"),
            Stop::dropoff("Placa Catalunya"),
        ],
    ));
    builder.recompute_validation();
    builder.go_to_next_step().await?;

    // Step 3
    builder.set_trip_name("Spring choir tour");
    builder.set_event_type("other", Some("Choir rehearsal".to_string()));
    builder.set_passengers(vec![
        Passenger::new("Marta Gil", "+34611222333", 41),
        Passenger::new("Joan Puig", "+34622333444", 52),
    ]);
    builder.recompute_validation();
    builder.go_to_next_step().await?;

    // Step 4
    builder.set_selected_vehicles(vec![SelectedVehicle::new("coach-55", 1)]);
    builder.recompute_validation();
    builder.go_to_next_step().await?;

    // Step 5
    builder.set_selected_amenities(["wifi", "water"]);
    tokio::time::sleep(config.autosave_delay() + Duration::from_millis(100)).await;

    let submitted = builder.submit().await?;
    tracing::info!(
        quote_id = %submitted.quote_id,
        status = ?submitted.status,
        step = builder.current_step(),
        "Quote submitted"
    );

    builder.dispose();
    Ok(())
}
