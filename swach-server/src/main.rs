use swach_server::{http, seed, state::AppState};

#[tokio::main]
async fn main() {
    let state = AppState::open("swach.db").expect("open table store");

    if !seed::is_seeded(&state).expect("check seed") {
        seed::seed_demo_data(&state).expect("seed demo data");
        println!("seeded demo curriculum and facility directory");
    }

    let app = http::api_router(state);
    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .expect("bind :8080");

    println!("swach-server listening on :8080");
    axum::serve(listener, app).await.expect("serve");
}
