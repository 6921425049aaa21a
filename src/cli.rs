use argparse::{ArgumentParser, Collect, Store, StoreOption};
use std::path::PathBuf;

pub struct CliArgs {
    pub input_file: PathBuf,
    pub home: Option<String>,
    pub bands: Vec<String>,
    pub modes: Vec<String>,
    pub call: Option<String>,
    pub tz: Option<String>,
    pub format: String,
    pub log_level: String,
    pub out: Option<PathBuf>,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            input_file: PathBuf::new(),
            home: None,
            bands: vec![],
            modes: vec![],
            call: None,
            tz: None,
            format: "csv".into(),
            log_level: "essential".into(),
            out: None,
        }
    }
}

pub fn parse_cli() -> CliArgs {
    let mut args = CliArgs::default();
    {
        let mut ap = ArgumentParser::new();
        ap.set_description("ADIF log -> mapped contact list (grid/lat-lon positions, distance and bearing)");
        ap.refer(&mut args.input_file)
            .add_argument("input_file", Store, "Input ADIF file")
            .required();
        ap.refer(&mut args.home)
            .add_option(&["--home"], StoreOption, "Home grid locator (4 or 6 chars)");
        ap.refer(&mut args.bands)
            .add_option(&["-b", "--band"], Collect, "Keep only this band (repeatable, ALL = any)");
        ap.refer(&mut args.modes)
            .add_option(&["-m", "--mode"], Collect, "Keep only this mode (repeatable, ALL = any)");
        ap.refer(&mut args.call)
            .add_option(&["--call"], StoreOption, "Keep callsigns matching this regex");
        ap.refer(&mut args.tz)
            .add_option(&["--tz"], StoreOption, "Timezone for contact times (IANA name, default UTC)");
        ap.refer(&mut args.format)
            .add_option(&["--format"], Store, "Output format: csv|json");
        ap.refer(&mut args.log_level)
            .add_option(&["--log"], Store, "Log level (essential|debug|trace|warn|error)");
        ap.refer(&mut args.out)
            .add_option(&["--out"], StoreOption, "Output path (default: input with .csv/.json)");
        ap.parse_args_or_exit();
    }
    args
}
