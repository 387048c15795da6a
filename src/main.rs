use log::debug;
use roomdata::layout::Layout;
use roomdata::patch::{write_image, PatchMode};
use roomdata::record::InteractionMode;
use roomdata::render::to_toml;
use roomdata::{Naming, Rom};
use serde::Serialize;
use std::env;
use std::error::Error;
use std::fmt::Display;
use std::path::Path;

fn usage(program: &str) {
    eprintln!("roomdata - read room data from an Oracle of Seasons or Ages image");
    eprintln!();
    eprintln!("Usage: {} [options] <romfile> <action> [args...]", program);
    eprintln!();
    eprintln!("Actions (arguments are hex):");
    eprintln!("  getroom <group> <room>               Music, objects and chest of a room");
    eprintln!("  searchchests [group [music]]         Chests, optionally filtered");
    eprintln!("  searchobjects <mode> <id> [sub-id]   Every room holding a matching object");
    eprintln!("  treasure <id> <sub-id>               Treasure and sprite descriptors");
    eprintln!("  sprite <index> <sub-index>           Sprite descriptor");
    eprintln!("  keesanity <outfile>                  Write a copy with every enemy a keese");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --layout <file.toml>  Read table locations from a file");
    eprintln!("  --raw                 Leave ids unnamed");
    eprintln!("  --toml                Print results as TOML");
    eprintln!("  -h, --help            Show this help message");
}

fn fatal(message: impl Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn hex_arg(text: &str) -> u8 {
    u8::from_str_radix(text.trim_start_matches("0x"), 16)
        .unwrap_or_else(|_| fatal(format!("Invalid hex value: {}", text)))
}

fn expect_args(action: &str, args: &[String], allowed: &[usize]) {
    if !allowed.contains(&args.len()) {
        fatal(format!(
            "{} expects {:?} args, got {}",
            action,
            allowed,
            args.len()
        ));
    }
}

struct Output {
    toml: bool,
}

impl Output {
    fn one<T: Serialize + Display>(&self, key: &str, value: &T) -> Result<(), Box<dyn Error>> {
        if self.toml {
            print!("{}", to_toml(key, value)?);
        } else {
            println!("{}", value);
        }
        Ok(())
    }

    fn list<T: Serialize + Display>(&self, key: &str, values: &[T]) -> Result<(), Box<dyn Error>> {
        if self.toml {
            print!("{}", to_toml(key, values)?);
        } else {
            for value in values {
                println!("{}", value);
            }
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Run(Options),
}

#[derive(Debug, PartialEq)]
struct Options {
    layout_path: Option<String>,
    naming: Naming,
    toml: bool,
    positional: Vec<String>,
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut options = Options {
        layout_path: None,
        naming: Naming::Symbolic,
        toml: false,
        positional: Vec::new(),
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--layout" => {
                i += 1;
                match args.get(i) {
                    Some(path) => options.layout_path = Some(path.clone()),
                    None => return Err("--layout needs a file".to_string()),
                }
            }
            "--raw" => options.naming = Naming::Raw,
            "--toml" => options.toml = true,
            "-h" | "--help" => return Ok(Command::Help),
            arg if arg.starts_with('-') => return Err(format!("Unknown option: {}", arg)),
            arg => options.positional.push(arg.to_string()),
        }
        i += 1;
    }
    Ok(Command::Run(options))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();

    let options = match parse_args(&args) {
        Ok(Command::Run(options)) => options,
        Ok(Command::Help) => {
            usage(&args[0]);
            std::process::exit(0);
        }
        Err(message) => {
            eprintln!("{}", message);
            usage(&args[0]);
            std::process::exit(1);
        }
    };

    if options.positional.len() < 2 {
        usage(&args[0]);
        std::process::exit(1);
    }
    let naming = options.naming;
    let output = Output {
        toml: options.toml,
    };
    let romfile = &options.positional[0];
    let action = options.positional[1].as_str();
    let params = &options.positional[2..];

    let mut rom = Rom::load(Path::new(romfile))?;
    if let Some(path) = &options.layout_path {
        rom = rom.with_layout(Layout::load(Path::new(path))?);
    }
    debug!("Running {} on a {} image", action, rom.title());

    match action {
        "getroom" => {
            expect_args(action, params, &[2]);
            let room = rom.decode_room(hex_arg(&params[0]), hex_arg(&params[1]), naming)?;
            output.one("room", &room)?;
        }
        "searchchests" => {
            expect_args(action, params, &[0, 1, 2]);
            let group = params.first().map(|p| hex_arg(p));
            let music = params.get(1).map(|p| hex_arg(p));
            let chests = rom.scan_chests(group, music, naming)?;
            output.list("chests", &chests)?;
        }
        "searchobjects" => {
            expect_args(action, params, &[2, 3]);
            let tag = hex_arg(&params[0]);
            let mode = InteractionMode::from_tag(tag)
                .unwrap_or_else(|| fatal(format!("Not an object mode: {:#04x}", tag)));
            let id = hex_arg(&params[1]);
            let sub_id = params.get(2).map(|p| hex_arg(p));
            let hits = rom.search_objects(mode, Some(id), sub_id, naming)?;
            output.list("objects", &hits)?;
        }
        "treasure" => {
            expect_args(action, params, &[2]);
            let treasure = rom.resolve_treasure(hex_arg(&params[0]), hex_arg(&params[1]), naming)?;
            output.one("treasure", &treasure)?;
        }
        "sprite" => {
            expect_args(action, params, &[2]);
            let sprite = rom.resolve_sprite(hex_arg(&params[0]), hex_arg(&params[1]))?;
            output.one("sprite", &sprite)?;
        }
        "keesanity" => {
            expect_args(action, params, &[1]);
            let patched = rom.apply_patch(PatchMode::Keesanity)?;
            write_image(Path::new(&params[0]), &patched)?;
        }
        other => fatal(format!("unknown action: {}", other)),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_options_and_positionals() {
        let parsed = parse_args(&args(&[
            "roomdata", "--raw", "rom.gbc", "--toml", "getroom", "00", "05",
        ]))
        .unwrap();
        assert_eq!(
            parsed,
            Command::Run(Options {
                layout_path: None,
                naming: Naming::Raw,
                toml: true,
                positional: args(&["rom.gbc", "getroom", "00", "05"]),
            })
        );
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        assert_eq!(
            parse_args(&args(&["roomdata", "--verbose", "rom.gbc", "getroom"])),
            Err("Unknown option: --verbose".to_string())
        );
        assert!(parse_args(&args(&["roomdata", "-x"])).is_err());
    }

    #[test]
    fn test_layout_needs_a_value() {
        assert!(parse_args(&args(&["roomdata", "rom.gbc", "--layout"])).is_err());
        assert_eq!(
            parse_args(&args(&["roomdata", "-h", "--bogus"])),
            Ok(Command::Help)
        );
    }
}
