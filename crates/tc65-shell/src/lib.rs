//! tc65sh
//!
//! A shell for the Cinterion TC65 module: browse and transfer files on its
//! flash file system over OBEX and pass AT commands through, all on one
//! serial line. Commands come from the terminal, a command file, an inline
//! list or a telnet client.
//!
//! ```text
//!   front-end ──► Command::parse ──► execute ──► Device ──► serial port
//!       ▲                               │
//!       └────────── println ◄───────────┘
//! ```

mod cli;
mod commands;
mod error;
mod frontend;
mod local;
mod logging;
mod tokenizer;

pub use cli::*;
pub use commands::*;
pub use error::*;
pub use frontend::*;
pub use local::*;
pub use logging::*;
pub use tokenizer::*;

use std::time::Duration;

use tc65_device::{Device, Transport};

/// Bring the session up, run the command loop, and always disconnect.
///
/// With a `sysstart_wait`, the module's `^SYSSTART` is awaited first.
pub fn run_session<T: Transport>(
    mut device: Device<T>,
    sysstart_wait: Option<Duration>,
    ui: &mut dyn UserInterface,
) -> Result<()> {
    let started = start_session(&mut device, sysstart_wait);
    if started.is_ok() {
        run_command_loop(&mut device, ui);
    }
    tracing::info!("disconnecting");
    let disconnected = device.disconnect();
    started?;
    disconnected?;
    Ok(())
}

fn start_session<T: Transport>(device: &mut Device<T>, sysstart_wait: Option<Duration>) -> Result<()> {
    if let Some(wait) = sysstart_wait {
        tracing::info!("waiting {} sec for SYSSTART", wait.as_secs());
        device.wait_for_sysstart(wait)?;
    }
    tracing::info!("initializing device");
    device.init_device()?;
    tracing::info!("forcing obex mode");
    device.ensure_obex()?;
    Ok(())
}

/// Run the shell as configured by `args`.
pub fn run(args: &Args) -> Result<()> {
    let config = args.device_config()?;

    let mut ui: Box<dyn UserInterface> = if let Some(path) = &args.command_file {
        tracing::info!("processing command file {}", path.display());
        Box::new(CommandFileUi::open(path)?)
    } else if let Some(list) = &args.commands {
        tracing::info!("processing commands {}", list);
        Box::new(InlineUi::new(list))
    } else if let Some(port) = args.telnet_port {
        Box::new(TelnetUi::listen(port)?)
    } else {
        let mut ui = InteractiveUi::stdio();
        ui.println("starting interactive mode, type 'exit' to exit, 'help' for help.");
        Box::new(ui)
    };

    tracing::info!(
        "connecting {} with {} baud, flow control {}",
        config.port,
        config.baud_rate,
        config.flow_control
    );
    let device = Device::connect(config)?;
    let wait = (args.wait_secs > 0).then(|| Duration::from_secs(args.wait_secs));
    run_session(device, wait, ui.as_mut())
}
