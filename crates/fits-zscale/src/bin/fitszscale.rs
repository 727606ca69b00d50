use std::fs::File;
use std::process;

use fits_zscale::io::SeekSource;
use fits_zscale::{DecodedImage, HeaderTable, PrimaryHdu, ZScaleOptions};
use flexi_logger::{Logger, LoggerHandle};

const USAGE: &str = "Usage: fitszscale [-v] <file.fits> [--samples N] [--contrast C]\n\n\
Print the primary header, image geometry and ZScale interval of a FITS file.";

#[derive(Debug, PartialEq)]
struct Args {
    path: String,
    verbose: bool,
    options: ZScaleOptions,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut verbose = false;
    let mut path = None;
    let mut options = ZScaleOptions::default();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            "--samples" => {
                let n = iter.next().ok_or("--samples needs a value")?;
                let n = n
                    .parse::<usize>()
                    .map_err(|e| format!("Invalid --samples '{}': {}", n, e))?;
                options = options.with_sample_size(n);
            }
            "--contrast" => {
                let c = iter.next().ok_or("--contrast needs a value")?;
                let c = c
                    .parse::<f64>()
                    .map_err(|e| format!("Invalid --contrast '{}': {}", c, e))?;
                options = options.with_contrast_factor(c);
            }
            s if s.starts_with('-') => return Err(format!("Unknown option: {}", s)),
            s => {
                if path.is_some() {
                    return Err("Too many arguments".to_string());
                }
                path = Some(s.to_string());
            }
        }
    }

    let path = path.ok_or_else(|| USAGE.to_string())?;
    Ok(Args {
        path,
        verbose,
        options,
    })
}

fn start_logging(verbose: bool) -> Result<LoggerHandle, String> {
    let level = if verbose { "debug" } else { "warn" };
    Logger::try_with_str(level)
        .and_then(|logger| logger.start())
        .map_err(|e| format!("Logger initialization failed with {}", e))
}

fn format_header(table: &HeaderTable) -> String {
    let mut out = String::new();
    for record in table.iter() {
        if record.comment.is_empty() {
            out.push_str(&format!("{:<8} = {}\n", record.key, record.value));
        } else {
            out.push_str(&format!(
                "{:<8} = {} / {}\n",
                record.key, record.value, record.comment
            ));
        }
    }
    out
}

fn format_summary(image: &DecodedImage, options: &ZScaleOptions) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Image: {} x {}  BITPIX={}  BSCALE={}  BZERO={}\n",
        image.width, image.height, image.bits_per_sample, image.scale, image.zero_offset
    ));
    if let Some((min, max)) = image.min_max() {
        out.push_str(&format!("Range: [{}, {}]\n", min, max));
    }
    let interval = image.zscale(options);
    out.push_str(&format!("ZScale: [{}, {}]\n", interval.low, interval.high));
    out
}

fn run(args: &Args) -> Result<String, String> {
    let path = args.path.as_str();
    let file = File::open(path).map_err(|e| format!("Error reading '{}': {}", path, e))?;
    let mut source =
        SeekSource::new(file).map_err(|e| format!("Error reading '{}': {}", path, e))?;
    let (hdu, image) =
        PrimaryHdu::read(&mut source).map_err(|e| format!("Error decoding '{}': {}", path, e))?;

    let mut out = format_header(&hdu.table);
    out.push('\n');
    out.push_str(&format_summary(&image, &args.options));
    Ok(out)
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = parse_args(&args).and_then(|args| {
        let _logger = start_logging(args.verbose)?;
        run(&args)
    });
    match result {
        Ok(output) => print!("{}", output),
        Err(msg) => {
            eprintln!("{}", msg);
            process::exit(1);
        }
    }
}
