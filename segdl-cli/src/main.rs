mod application;
mod presentation;

#[tokio::main]
async fn main() {
    segdl_grpc::telemetry::init("warn");
    if let Err(e) = application::run().await {
        eprintln!("error: {}", application::describe(&e));
        std::process::exit(1);
    }
}
