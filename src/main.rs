use bucket_io::{app, utils::init_logger};

fn main() -> anyhow::Result<()> {
    init_logger();

    let stdout = std::io::stdout();
    app::run(&mut stdout.lock())?;

    Ok(())
}
