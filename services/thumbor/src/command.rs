//! Typed transformation commands.
use std::str::FromStr;

use thumbsign_core::{Error, Result};

use super::command_set::{CommandSet, Dimension, Filter, FilterArg};
use super::constants::DIMENSION_ORIG;

/// Command is one transformation that can be applied to a [`CommandSet`].
///
/// Every [`UrlBuilder`](crate::UrlBuilder) method has a matching variant, so
/// transformations can be stored, replayed, or parsed from text like
/// `fit_in(640,480)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `trim[:colour_source][:tolerance]`
    Trim {
        /// `top-left` or `bottom-right`.
        colour_source: Option<String>,
        /// Colour distance tolerance.
        tolerance: Option<i64>,
    },
    /// Manual crop window.
    Crop {
        /// Left edge.
        top_left_x: i64,
        /// Top edge.
        top_left_y: i64,
        /// Right edge.
        bottom_right_x: i64,
        /// Bottom edge.
        bottom_right_y: i64,
    },
    /// Plain `WxH` resize.
    Resize {
        /// Target width.
        width: Dimension,
        /// Target height.
        height: Dimension,
    },
    /// `fit-in/WxH`
    FitIn {
        /// Box width.
        width: i64,
        /// Box height.
        height: i64,
    },
    /// `full-fit-in/WxH`
    FullFitIn {
        /// Box width.
        width: i64,
        /// Box height.
        height: i64,
    },
    /// `adaptive-fit-in/WxH`
    AdaptiveFitIn {
        /// Box width.
        width: i64,
        /// Box height.
        height: i64,
    },
    /// Horizontal flip toggle.
    FlipHorizontal(bool),
    /// Vertical flip toggle.
    FlipVertical(bool),
    /// Horizontal alignment.
    Halign(String),
    /// Vertical alignment.
    Valign(String),
    /// Smart crop toggle.
    SmartCrop(bool),
    /// Metadata only toggle.
    MetadataOnly(bool),
    /// Generic filter call.
    AddFilter(Filter),
    /// `quality(n)`
    Quality(i64),
    /// `format(name)`
    Format(String),
    /// `format(webp)`
    Webp,
    /// `format(avif)`
    Avif,
    /// `blur(radius[,sigma])`
    Blur {
        /// Blur radius.
        radius: i64,
        /// Optional sigma.
        sigma: Option<i64>,
    },
    /// `brightness(n)`
    Brightness(i64),
    /// `contrast(n)`
    Contrast(i64),
    /// `grayscale()`
    Grayscale,
    /// `rotate(angle)`
    Rotate(i64),
    /// `sharpen(amount,radius,luminance_only)`
    Sharpen {
        /// Sharpen amount.
        amount: f64,
        /// Sharpen radius.
        radius: f64,
        /// Apply to luminance only.
        luminance_only: bool,
    },
    /// `noise(n)`
    Noise(i64),
    /// `watermark(url,x,y,alpha)`
    Watermark {
        /// Watermark image location.
        image_url: String,
        /// Horizontal position.
        x: i64,
        /// Vertical position.
        y: i64,
        /// Transparency.
        alpha: i64,
    },
    /// `fill(colour)`
    Fill(String),
    /// `round_corner(radius[,r,g,b])`
    RoundCorners {
        /// Corner radius.
        radius: i64,
        /// Background colour.
        background: Option<(i64, i64, i64)>,
    },
    /// `strip_exif()`
    StripExif,
    /// `strip_icc()`
    StripIcc,
    /// `no_upscale()`
    NoUpscale,
    /// `saturation(f)`
    Saturation(f64),
    /// `rgb(r,g,b)`
    Rgb {
        /// Red adjustment.
        red: i64,
        /// Green adjustment.
        green: i64,
        /// Blue adjustment.
        blue: i64,
    },
    /// `max_bytes(n)`
    MaxBytes(i64),
    /// `equalize()`
    Equalize,
    /// `convolution(matrix,columns,normalize)`
    Convolution {
        /// Matrix values row by row.
        matrix: Vec<f64>,
        /// Number of columns.
        columns: i64,
        /// Normalize the result.
        normalize: bool,
    },
}

impl CommandSet {
    /// Apply a command to this set.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Trim {
                colour_source,
                tolerance,
            } => self.trim(colour_source.as_deref(), tolerance),
            Command::Crop {
                top_left_x,
                top_left_y,
                bottom_right_x,
                bottom_right_y,
            } => self.crop(top_left_x, top_left_y, bottom_right_x, bottom_right_y),
            Command::Resize { width, height } => self.resize(width, height),
            Command::FitIn { width, height } => self.fit_in(width, height),
            Command::FullFitIn { width, height } => self.full_fit_in(width, height),
            Command::AdaptiveFitIn { width, height } => self.adaptive_fit_in(width, height),
            Command::FlipHorizontal(v) => self.flip_horizontal(v),
            Command::FlipVertical(v) => self.flip_vertical(v),
            Command::Halign(v) => self.halign(v),
            Command::Valign(v) => self.valign(v),
            Command::SmartCrop(v) => self.smart_crop(v),
            Command::MetadataOnly(v) => self.metadata_only(v),
            Command::AddFilter(filter) => self.push_filter(filter),
            Command::Quality(v) => self.quality(v),
            Command::Format(v) => self.format(&v),
            Command::Webp => self.webp(),
            Command::Avif => self.avif(),
            Command::Blur { radius, sigma } => self.blur(radius, sigma),
            Command::Brightness(v) => self.brightness(v),
            Command::Contrast(v) => self.contrast(v),
            Command::Grayscale => self.grayscale(),
            Command::Rotate(v) => self.rotate(v),
            Command::Sharpen {
                amount,
                radius,
                luminance_only,
            } => self.sharpen(amount, radius, luminance_only),
            Command::Noise(v) => self.noise(v),
            Command::Watermark {
                image_url,
                x,
                y,
                alpha,
            } => self.watermark(&image_url, x, y, alpha),
            Command::Fill(v) => self.fill(&v),
            Command::RoundCorners { radius, background } => self.round_corners(radius, background),
            Command::StripExif => self.strip_exif(),
            Command::StripIcc => self.strip_icc(),
            Command::NoUpscale => self.no_upscale(),
            Command::Saturation(v) => self.saturation(v),
            Command::Rgb { red, green, blue } => self.rgb(red, green, blue),
            Command::MaxBytes(v) => self.max_bytes(v),
            Command::Equalize => self.equalize(),
            Command::Convolution {
                matrix,
                columns,
                normalize,
            } => self.convolution(&matrix, columns, normalize),
        }
    }
}

/// Parse a command from its textual call form.
///
/// ## Format
///
/// ```text
/// name
/// name(arg1,arg2,...)
/// ```
///
/// `name` is the snake_case builder method, for example `fit_in(640,480)`,
/// `resize(orig,480)` or `add_filter(brightness,50)`. Arguments are split on `,`.
impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let args = Args::parse(s)?;

        let cmd = match args.name {
            "trim" => {
                args.arity(0, 2)?;
                Command::Trim {
                    colour_source: args.get(0).filter(|v| !v.is_empty()).map(String::from),
                    tolerance: args.opt_int(1)?,
                }
            }
            "crop" => {
                args.arity(4, 4)?;
                Command::Crop {
                    top_left_x: args.int(0)?,
                    top_left_y: args.int(1)?,
                    bottom_right_x: args.int(2)?,
                    bottom_right_y: args.int(3)?,
                }
            }
            "resize" => {
                args.arity(2, 2)?;
                Command::Resize {
                    width: args.dimension(0)?,
                    height: args.dimension(1)?,
                }
            }
            "fit_in" => {
                args.arity(2, 2)?;
                Command::FitIn {
                    width: args.int(0)?,
                    height: args.int(1)?,
                }
            }
            "full_fit_in" => {
                args.arity(2, 2)?;
                Command::FullFitIn {
                    width: args.int(0)?,
                    height: args.int(1)?,
                }
            }
            "adaptive_fit_in" => {
                args.arity(2, 2)?;
                Command::AdaptiveFitIn {
                    width: args.int(0)?,
                    height: args.int(1)?,
                }
            }
            "flip_horizontal" => {
                args.arity(0, 1)?;
                Command::FlipHorizontal(args.opt_bool(0)?.unwrap_or(true))
            }
            "flip_vertical" => {
                args.arity(0, 1)?;
                Command::FlipVertical(args.opt_bool(0)?.unwrap_or(true))
            }
            "halign" => {
                args.arity(1, 1)?;
                Command::Halign(args.string(0))
            }
            "valign" => {
                args.arity(1, 1)?;
                Command::Valign(args.string(0))
            }
            "smart_crop" => {
                args.arity(1, 1)?;
                Command::SmartCrop(args.bool(0)?)
            }
            "metadata_only" => {
                args.arity(1, 1)?;
                Command::MetadataOnly(args.bool(0)?)
            }
            "add_filter" => {
                args.arity(1, usize::MAX)?;
                Command::AddFilter(Filter::new(
                    args.string(0),
                    args.args[1..].iter().map(|v| FilterArg::from(*v)),
                ))
            }
            "quality" => {
                args.arity(1, 1)?;
                Command::Quality(args.int(0)?)
            }
            "format" => {
                args.arity(1, 1)?;
                Command::Format(args.string(0))
            }
            "webp" => {
                args.arity(0, 0)?;
                Command::Webp
            }
            "avif" => {
                args.arity(0, 0)?;
                Command::Avif
            }
            "blur" => {
                args.arity(1, 2)?;
                Command::Blur {
                    radius: args.int(0)?,
                    sigma: args.opt_int(1)?,
                }
            }
            "brightness" => {
                args.arity(1, 1)?;
                Command::Brightness(args.int(0)?)
            }
            "contrast" => {
                args.arity(1, 1)?;
                Command::Contrast(args.int(0)?)
            }
            "grayscale" => {
                args.arity(0, 0)?;
                Command::Grayscale
            }
            "rotate" => {
                args.arity(1, 1)?;
                Command::Rotate(args.int(0)?)
            }
            "sharpen" => {
                args.arity(2, 3)?;
                Command::Sharpen {
                    amount: args.float(0)?,
                    radius: args.float(1)?,
                    luminance_only: args.opt_bool(2)?.unwrap_or(false),
                }
            }
            "noise" => {
                args.arity(1, 1)?;
                Command::Noise(args.int(0)?)
            }
            "watermark" => {
                args.arity(1, 4)?;
                Command::Watermark {
                    image_url: args.string(0),
                    x: args.opt_int(1)?.unwrap_or(0),
                    y: args.opt_int(2)?.unwrap_or(0),
                    alpha: args.opt_int(3)?.unwrap_or(0),
                }
            }
            "fill" => {
                args.arity(1, 1)?;
                Command::Fill(args.string(0))
            }
            "round_corners" => {
                args.arity(1, 4)?;
                let background = match args.args.len() {
                    4 => Some((args.int(1)?, args.int(2)?, args.int(3)?)),
                    1 => None,
                    _ => {
                        return Err(Error::request_invalid(
                            "round_corners takes a radius and either zero or three colour components",
                        ))
                    }
                };
                Command::RoundCorners {
                    radius: args.int(0)?,
                    background,
                }
            }
            "strip_exif" => {
                args.arity(0, 0)?;
                Command::StripExif
            }
            "strip_icc" => {
                args.arity(0, 0)?;
                Command::StripIcc
            }
            "no_upscale" => {
                args.arity(0, 0)?;
                Command::NoUpscale
            }
            "saturation" => {
                args.arity(1, 1)?;
                Command::Saturation(args.float(0)?)
            }
            "rgb" => {
                args.arity(3, 3)?;
                Command::Rgb {
                    red: args.int(0)?,
                    green: args.int(1)?,
                    blue: args.int(2)?,
                }
            }
            "max_bytes" => {
                args.arity(1, 1)?;
                Command::MaxBytes(args.int(0)?)
            }
            "equalize" => {
                args.arity(0, 0)?;
                Command::Equalize
            }
            "convolution" => {
                args.arity(2, 3)?;
                let matrix = args.args[0]
                    .split(';')
                    .map(|v| {
                        v.trim().parse::<f64>().map_err(|e| {
                            Error::request_invalid(format!(
                                "convolution matrix value `{v}` is not a number"
                            ))
                            .with_source(e)
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Command::Convolution {
                    matrix,
                    columns: args.int(1)?,
                    normalize: args.opt_bool(2)?.unwrap_or(false),
                }
            }
            name => {
                return Err(Error::unknown_operation(format!(
                    "command `{name}` does not exist"
                )))
            }
        };

        Ok(cmd)
    }
}

/// Name and raw arguments of a textual command.
struct Args<'a> {
    name: &'a str,
    args: Vec<&'a str>,
}

impl<'a> Args<'a> {
    fn parse(s: &'a str) -> Result<Self> {
        let s = s.trim();
        let (name, args) = match s.split_once('(') {
            None => (s, vec![]),
            Some((name, rest)) => {
                let inner = rest.strip_suffix(')').ok_or_else(|| {
                    Error::request_invalid(format!("command `{s}` is missing a closing `)`"))
                })?;
                let args = if inner.trim().is_empty() {
                    vec![]
                } else {
                    inner.split(',').map(str::trim).collect()
                };
                (name.trim(), args)
            }
        };

        if name.is_empty() {
            return Err(Error::request_invalid(format!(
                "command `{s}` has no name"
            )));
        }

        Ok(Self { name, args })
    }

    fn arity(&self, min: usize, max: usize) -> Result<()> {
        let n = self.args.len();
        if n < min || n > max {
            let expected = if min == max {
                min.to_string()
            } else if max == usize::MAX {
                format!("at least {min}")
            } else {
                format!("{min} to {max}")
            };
            return Err(Error::request_invalid(format!(
                "command `{}` takes {expected} arguments, got {n}",
                self.name
            )));
        }
        Ok(())
    }

    fn get(&self, idx: usize) -> Option<&'a str> {
        self.args.get(idx).copied()
    }

    fn string(&self, idx: usize) -> String {
        self.get(idx).unwrap_or_default().to_string()
    }

    fn int(&self, idx: usize) -> Result<i64> {
        let v = self.get(idx).unwrap_or_default();
        v.parse().map_err(|e| {
            Error::request_invalid(format!(
                "argument {idx} of `{}` is not an integer: `{v}`",
                self.name
            ))
            .with_source(e)
        })
    }

    fn opt_int(&self, idx: usize) -> Result<Option<i64>> {
        match self.get(idx) {
            None | Some("") => Ok(None),
            Some(_) => self.int(idx).map(Some),
        }
    }

    fn float(&self, idx: usize) -> Result<f64> {
        let v = self.get(idx).unwrap_or_default();
        v.parse().map_err(|e| {
            Error::request_invalid(format!(
                "argument {idx} of `{}` is not a number: `{v}`",
                self.name
            ))
            .with_source(e)
        })
    }

    fn bool(&self, idx: usize) -> Result<bool> {
        let v = self.get(idx).unwrap_or_default();
        v.parse().map_err(|e| {
            Error::request_invalid(format!(
                "argument {idx} of `{}` is not a boolean: `{v}`",
                self.name
            ))
            .with_source(e)
        })
    }

    fn opt_bool(&self, idx: usize) -> Result<Option<bool>> {
        match self.get(idx) {
            None | Some("") => Ok(None),
            Some(_) => self.bool(idx).map(Some),
        }
    }

    fn dimension(&self, idx: usize) -> Result<Dimension> {
        match self.get(idx) {
            Some(DIMENSION_ORIG) => Ok(Dimension::Orig),
            _ => self.int(idx).map(Dimension::Pixels),
        }
    }
}
