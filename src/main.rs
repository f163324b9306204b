use std::sync::Arc;

use ethersw::error::SwitchError;
use ethersw::frame_io::{is_valid_device, FrameIoFactory, PnetFrameIo};
use ethersw::interface::Interface;
use ethersw::switch::Switch;
use ethersw::{cli, repl};

fn bootstrap() -> Result<Arc<Switch>, SwitchError> {
    let config = cli::parse()?;

    let devices = PnetFrameIo::list_devices().map_err(|e| SwitchError::Enumeration(e.to_string()))?;
    let mut valid = Vec::new();
    for (name, flags) in devices {
        let hwaddr = match PnetFrameIo::hwaddr(&name) {
            Ok(addr) => addr,
            Err(_) => continue,
        };
        if is_valid_device(flags, hwaddr) {
            valid.push(name);
        }
    }
    if valid.len() < 2 {
        return Err(SwitchError::NotEnoughInterfaces);
    }

    let switch = Switch::new();
    for name in valid {
        let handle = PnetFrameIo::open(&name)?;
        switch.add_interface(Arc::new(Interface::new(name, handle)));
    }
    switch.spawn_aging(config);

    Ok(switch)
}

fn main() {
    env_logger::init();

    let switch = match bootstrap() {
        Ok(switch) => switch,
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(e.exit_code() as i32);
        }
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    repl::run(&switch, stdin.lock(), stdout.lock());

    switch.shutdown();
}
