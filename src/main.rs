#[tokio::main]
async fn main() {
    let code = repoaudit::app::startup::startup().await;
    std::process::exit(code);
}
