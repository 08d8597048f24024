use env_logger::Env;
use fwcombine::{chip::Esp32c3, Config, Error};
use main_error::MainError;
use std::path::PathBuf;
use structopt::StructOpt;

/// Combine a bootloader and an application into one flash image
#[derive(StructOpt)]
struct Opt {
    /// Path to a config file, default to be fwcombine.toml if it exists
    #[structopt(short, long, env = "FWCOMBINE_CONFIG", parse(from_os_str))]
    config: Option<PathBuf>,
    /// Bootloader image, placed at address 0
    #[structopt(short, long, env = "FWCOMBINE_BOOTLOADER", parse(from_os_str))]
    bootloader: Option<PathBuf>,
    /// Application image, placed at the base offset
    #[structopt(short, long, env = "FWCOMBINE_MAIN", parse(from_os_str))]
    main: Option<PathBuf>,
    /// Output file
    #[structopt(short, long, env = "FWCOMBINE_OUTPUT", parse(from_os_str))]
    output: Option<PathBuf>,
    /// Address of the application, default to be 0x10000
    #[structopt(long, env = "FWCOMBINE_BASE_OFFSET", parse(try_from_str = parse_int::parse))]
    base_offset: Option<u32>,
    /// Byte used to fill the gap, default to be 0xff
    #[structopt(long, env = "FWCOMBINE_FILL_BYTE", parse(try_from_str = parse_int::parse))]
    fill_byte: Option<u8>,
}

impl Opt {
    fn into_config(self) -> (Option<PathBuf>, Config) {
        let config = Config {
            bootloader: self.bootloader,
            main: self.main,
            output: self.output,
            base_offset: self.base_offset,
            fill_byte: self.fill_byte,
        };
        (self.config, config)
    }
}

fn run(args: Opt) -> Result<PathBuf, Error> {
    let (config_path, overrides) = args.into_config();
    let settings = Config::load(config_path.as_deref())?
        .merge(overrides)
        .resolve(&Esp32c3)?;
    log::trace!("Settings: {:x?}", settings);

    fwcombine::combine(&settings)
}

#[paw::main]
fn main(args: Opt) -> Result<(), MainError> {
    env_logger::Builder::from_env(Env::default().default_filter_or("fwcombine=info"))
        .format_timestamp(None)
        .init();

    let output = run(args)?;
    println!("Combined firmware saved to {}", output.display());

    Ok(())
}
