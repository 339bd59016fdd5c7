// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::{App, Arg, ArgMatches};
use failure::Error;
use log::{info, LevelFilter};
use num::Complex;
use smoothbrot::{render_image, Interpolation, PaletteSpec, Preset, RenderConfig};
use std::path::Path;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn parse_list<T: FromStr>(s: &str) -> Option<Vec<T>> {
    s.split(',').map(|w| T::from_str(w.trim()).ok()).collect()
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_parse<T>(s: &str) -> Result<(), String>
where
    T: FromStr<Err = String>,
{
    T::from_str(s).map(|_| ())
}

const OUTPUT: &str = "output-dir";
const SIZE: &str = "size";
const CENTER: &str = "center";
const WIDTHS: &str = "widths";
const ITERATIONS: &str = "iterations";
const RADIUS: &str = "escape-radius";
const PALETTE: &str = "palette";
const INTERPOLATION: &str = "interpolation";
const COLORS: &str = "colors";
const NO_SMOOTH: &str = "no-smooth";
const THREADS: &str = "threads";
const VERBOSE: &str = "verbose";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("smoothbrot")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Smooth-coloured Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value(".")
                .help("Directory the images are written to"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1920x1080")
                .validator(|s| {
                    validate_pair::<usize>(&s, 'x', "Could not parse output image size")
                })
                .help("Size of each output image"),
        )
        .arg(
            Arg::with_name(CENTER)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-0.7435,0.1314")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse center point"))
                .help("Point on the complex plane at the center of the image"),
        )
        .arg(
            Arg::with_name(WIDTHS)
                .long(WIDTHS)
                .short("w")
                .takes_value(true)
                .default_value("0.003,0.002,0.01,0.05,0.1,0.5,1,2,3,4,5")
                .validator(|s| match parse_list::<f64>(&s) {
                    Some(_) => Ok(()),
                    None => Err("Could not parse list of widths".to_string()),
                })
                .help("Comma-separated widths of the real axis; one image per width"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("512")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Maximum number of iterations per point"),
        )
        .arg(
            Arg::with_name(RADIUS)
                .long(RADIUS)
                .short("r")
                .takes_value(true)
                .default_value("1000")
                .validator(|s| match f64::from_str(&s) {
                    Ok(_) => Ok(()),
                    Err(_) => Err("Could not parse escape radius".to_string()),
                })
                .help("Escape radius, which must be greater than 1"),
        )
        .arg(
            Arg::with_name(PALETTE)
                .long(PALETTE)
                .short("p")
                .takes_value(true)
                .default_value("classic")
                .validator(|s| validate_parse::<Preset>(&s))
                .help("Palette: classic, grayscale or spectrum"),
        )
        .arg(
            Arg::with_name(INTERPOLATION)
                .long(INTERPOLATION)
                .takes_value(true)
                .default_value("cubic")
                .validator(|s| validate_parse::<Interpolation>(&s))
                .help("Gradient interpolation: linear or cubic"),
        )
        .arg(
            Arg::with_name(COLORS)
                .long(COLORS)
                .short("n")
                .takes_value(true)
                .default_value("256")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        65_536,
                        "Could not parse colour count",
                        "Colour count must be between 1 and 65536",
                    )
                })
                .help("Number of entries in the palette"),
        )
        .arg(
            Arg::with_name(NO_SMOOTH)
                .long(NO_SMOOTH)
                .help("Colour by whole iteration counts"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in the renderer [default: all cores]"),
        )
        .arg(
            Arg::with_name(VERBOSE)
                .short("v")
                .multiple(true)
                .help("More logging; repeat for more"),
        )
        .get_matches()
}

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

// The validators above have already vetted every value, so a failure
// here means a validator and its parser disagree.
fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, Error> {
    matches
        .value_of(name)
        .and_then(|s| T::from_str(s).ok())
        .ok_or_else(|| failure::format_err!("Could not parse --{}", name))
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let (width, height) = matches
        .value_of(SIZE)
        .and_then(|s| parse_pair::<usize>(s, 'x'))
        .ok_or_else(|| failure::format_err!("Error parsing image dimensions"))?;
    let center = matches
        .value_of(CENTER)
        .and_then(parse_complex)
        .ok_or_else(|| failure::format_err!("Error parsing center point"))?;
    let widths = matches
        .value_of(WIDTHS)
        .and_then(parse_list::<f64>)
        .ok_or_else(|| failure::format_err!("Error parsing widths"))?;
    let preset: Preset = value(matches, PALETTE)?;
    let interpolation: Interpolation = value(matches, INTERPOLATION)?;
    let threads: usize = match matches.value_of(THREADS) {
        Some(_) => value(matches, THREADS)?,
        None => num_cpus::get(),
    };
    let output = Path::new(matches.value_of(OUTPUT).unwrap_or("."));

    let template = RenderConfig {
        width,
        height,
        center,
        plane_width: 1.0,
        max_iterations: value(matches, ITERATIONS)?,
        escape_radius: value(matches, RADIUS)?,
        smooth: !matches.is_present(NO_SMOOTH),
        palette: PaletteSpec::from_preset(preset, interpolation, value(matches, COLORS)?),
    };

    for (i, plane_width) in widths.iter().enumerate() {
        info!("Generating image {} of {}", i + 1, widths.len());
        let config = RenderConfig {
            plane_width: *plane_width,
            ..template.clone()
        };
        let image = render_image(&config, threads)?;
        let filename = output.join(format!("{}.png", plane_width));
        image.save(&filename)?;
        info!("Wrote {}", filename.display());
    }
    Ok(())
}

fn main() {
    let matches = args();
    init_logging(matches.occurrences_of(VERBOSE));
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
