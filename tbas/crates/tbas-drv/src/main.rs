use std::process;

fn main() {
    if let Err(error) = tbas_drv::main() {
        eprintln!("error: {error:#}");
        process::exit(1);
    }
}
