use eyre::{Context, Result};
use storyteller::app::{App, Controller, destruct_terminal_for_panic};
use storyteller::backend::new_backend;
use storyteller::cli::Command;
use storyteller::config::{init_logger, verbose};

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Command::new();
    if cmd.version() {
        println!("{}", cmd.version_line());
        return Ok(());
    }

    std::panic::set_hook(Box::new(|panic_info| {
        destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let config = cmd.load_config()?;
    storyteller::config::init(config.clone())?;

    init_logger(&config.log)?;
    verbose!("[+] Logger initialized");

    verbose!("[+] Initializing backend...");
    let (completion, narration) =
        new_backend(&config.backend, &config.narration).wrap_err("initializing backend")?;

    let controller = Controller::new(completion, narration).with_story(config.story.clone());
    let mut app = App::new(controller, config.narration.clone());
    log::info!("Session started");

    let result = app.run().await;

    let convo = app.session().conversation();
    log::info!(
        "Session ended with {} turns and {} stories",
        convo.len(),
        convo.archive().len()
    );
    result
}
