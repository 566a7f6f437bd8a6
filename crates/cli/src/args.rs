use clap::Parser;
use std::path::PathBuf;

use mediaconv_core::FileType;

/// Convert image, audio and video files.
///
/// Images are converted in-process; audio and video need FFmpeg.
#[derive(Debug, Parser)]
#[command(name = "mediaconv", version)]
pub struct Cli {
    /// Input file
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Target format (jpg, png, mp3, mp4, ...); detected from the output extension if omitted
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// List supported formats and exit
    #[arg(long)]
    pub formats: bool,

    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Input file, as an alternative to -i
    #[arg(value_name = "INPUT")]
    pub input_file: Option<PathBuf>,

    /// Output file, as an alternative to -o
    #[arg(value_name = "OUTPUT")]
    pub output_file: Option<PathBuf>,
}

/// What the user asked for once flags and positionals are combined.
#[derive(Debug, PartialEq)]
pub enum Command {
    ListFormats,
    Convert {
        input: PathBuf,
        output: PathBuf,
        target: TargetFormat,
    },
}

/// Result of interpreting `--format`.
#[derive(Debug, PartialEq)]
pub enum TargetFormat {
    /// Not given: detect from the output path.
    Detect,
    Explicit(FileType),
    /// Given but not recognised; the output extension is used instead.
    Unrecognised(String),
}

impl TargetFormat {
    pub fn file_type(&self) -> Option<FileType> {
        match self {
            Self::Explicit(format) => Some(*format),
            Self::Detect | Self::Unrecognised(_) => None,
        }
    }
}

impl Cli {
    /// Resolves the command, failing when input or output is missing.
    pub fn resolve(&self) -> Result<Command, String> {
        if self.formats {
            return Ok(Command::ListFormats);
        }

        let mut positionals = self
            .input_file
            .iter()
            .chain(self.output_file.iter())
            .cloned();
        let input = self.input.clone().or_else(|| positionals.next());
        let output = self.output.clone().or_else(|| positionals.next());

        let input = input.ok_or_else(|| "missing input file".to_string())?;
        let output = output.ok_or_else(|| "missing output file".to_string())?;

        let target = match &self.format {
            None => TargetFormat::Detect,
            Some(name) => match name.parse::<FileType>() {
                Ok(format) if format.is_known() => TargetFormat::Explicit(format),
                _ => TargetFormat::Unrecognised(name.clone()),
            },
        };

        Ok(Command::Convert {
            input,
            output,
            target,
        })
    }
}
