use clap::{App, Arg, SubCommand};
use icomaker::{IconDir, IconImage, IconSize, ResizeFilter, SizeRequest};
use std::error::Error;
use std::fs;
use std::path::PathBuf;

//===========================================================================//

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let matches = App::new("icotool")
        .version("0.1")
        .about("Converts PNG images into ICO files")
        .subcommand(
            SubCommand::with_name("create")
                .about("Creates a multi-size ICO file from one PNG image")
                .arg(
                    Arg::with_name("output")
                        .takes_value(true)
                        .value_name("PATH")
                        .short("o")
                        .long("output")
                        .help("Sets output path"),
                )
                .arg(
                    Arg::with_name("size")
                        .takes_value(true)
                        .multiple(true)
                        .number_of_values(1)
                        .value_name("WxH")
                        .short("s")
                        .long("size")
                        .help("Adds an icon size (default: 16, 32 and 48)"),
                )
                .arg(
                    Arg::with_name("filter")
                        .takes_value(true)
                        .value_name("NAME")
                        .short("f")
                        .long("filter")
                        .possible_values(&[
                            "nearest",
                            "triangle",
                            "catmullrom",
                            "gaussian",
                            "lanczos3",
                        ])
                        .help("Sets the resampling filter"),
                )
                .arg(Arg::with_name("image").required(true)),
        )
        .subcommand(
            SubCommand::with_name("extract")
                .about("Extracts one image from an ICO file as PNG")
                .arg(
                    Arg::with_name("output")
                        .takes_value(true)
                        .value_name("PATH")
                        .short("o")
                        .long("output")
                        .help("Sets output path"),
                )
                .arg(Arg::with_name("ico").required(true))
                .arg(Arg::with_name("index").required(true)),
        )
        .subcommand(
            SubCommand::with_name("list")
                .about("Lists images in an ICO file")
                .arg(Arg::with_name("ico").required(true)),
        )
        .get_matches();
    if let Some(submatches) = matches.subcommand_matches("create") {
        let out_path = if let Some(path) = submatches.value_of("output") {
            PathBuf::from(path)
        } else {
            let mut path = PathBuf::from("out.ico");
            let mut index: i32 = 0;
            while path.exists() {
                index += 1;
                path = PathBuf::from(format!("out{}.ico", index));
            }
            path
        };
        let sizes = match submatches.values_of("size") {
            Some(values) => {
                let sizes = values
                    .map(parse_size)
                    .collect::<Result<Vec<IconSize>, Box<dyn Error>>>()?;
                SizeRequest::new(sizes)?
            }
            None => SizeRequest::default(),
        };
        let filter = submatches
            .value_of("filter")
            .and_then(ResizeFilter::from_name)
            .unwrap_or_default();
        let path = submatches.value_of("image").unwrap_or_default();
        let image = IconImage::read_png(fs::File::open(path)?)?;
        println!(
            "Read {:?} ({}x{})",
            path,
            image.width(),
            image.height()
        );
        let ico = icomaker::encode(&image.with_filter(filter), &sizes)?;
        ico.write_to(fs::File::create(&out_path)?)?;
        println!("Wrote {:?} ({} bytes)", out_path, ico.len());
    } else if let Some(submatches) = matches.subcommand_matches("extract") {
        let path = submatches.value_of("ico").unwrap_or_default();
        let icondir = IconDir::read(fs::File::open(path)?)?;
        let index = submatches.value_of("index").unwrap_or_default();
        let index = index.parse::<usize>()?;
        let entry = match icondir.entries().get(index) {
            Some(entry) => entry,
            None => {
                return Err(format!(
                    "{:?} has only {} entries",
                    path,
                    icondir.entries().len()
                )
                .into())
            }
        };
        let image = entry.decode()?;
        let out_path = if let Some(path) = submatches.value_of("output") {
            PathBuf::from(path)
        } else {
            PathBuf::from(format!("{}.{}.png", path, index))
        };
        image.write_png(fs::File::create(out_path)?)?;
    } else if let Some(submatches) = matches.subcommand_matches("list") {
        let path = submatches.value_of("ico").unwrap_or_default();
        let icondir = IconDir::read(fs::File::open(path)?)?;
        println!("Resource type: {:?}", icondir.resource_type());
        for (index, entry) in icondir.entries().iter().enumerate() {
            println!(
                "{:5}: {}x{} {} bpp, {} bytes at offset {}",
                index,
                entry.width(),
                entry.height(),
                entry.bits_per_pixel(),
                entry.data_size(),
                entry.data_offset()
            );
        }
    }
    Ok(())
}

fn parse_size(value: &str) -> Result<IconSize, Box<dyn Error>> {
    let (width, height) = match value.split_once(|c| c == 'x' || c == 'X') {
        Some((width, height)) => (width.parse()?, height.parse()?),
        None => {
            let size = value.parse()?;
            (size, size)
        }
    };
    Ok(IconSize::new(width, height)?)
}

//===========================================================================//
