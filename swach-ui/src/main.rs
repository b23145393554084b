mod app;
mod bridge;
mod dto;

use app::App;

fn main() {
    leptos::mount_to_body(App);
}
