/*
    aostool
    https://github.com/aoskit/aoskit

    Copyright 2025 aoskit contributors

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------
*/

mod args;

use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::{bail, Context};

use aoskit::extract::{extract_archive, write_decoded_abm};
use aoskit::formats::abm::{AbmContent, AbmFormat};
use aoskit::formats::scr::ScrFormat;
use aoskit::repack::repack_directory;
use aoskit::util::split_extension;
use aoskit::ProcessOptions;

use args::{Command, ConvertParams};

fn main() {
    env_logger::init();

    let command = args::command_parser().run();
    log::debug!("Running command: {:?}", command);

    if let Err(e) = run(command) {
        // Failures report to standard output with a nonzero exit status.
        println!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Version => {
            println!("aostool {}", env!("CARGO_PKG_VERSION"));
        }
        Command::Extract(params) => {
            let options = if params.nodecode {
                ProcessOptions::NO_DECODE
            }
            else {
                ProcessOptions::empty()
            };
            let output_dir = extract_archive(&params.archive, &params.output, options)
                .with_context(|| format!("extracting {}", params.archive.display()))?;
            println!("Extracted to {}", output_dir.display());
        }
        Command::Repack(params) => {
            let options = if params.noencode {
                ProcessOptions::NO_ENCODE
            }
            else {
                ProcessOptions::empty()
            };
            repack_directory(&params.input, &params.archive, options)
                .with_context(|| format!("repacking {}", params.input.display()))?;
            println!("Created {}", params.archive.display());
        }
        Command::Decode(params) => decode_file(&params)?,
        Command::Encode(params) => encode_file(&params)?,
    }

    Ok(())
}

fn decode_file(params: &ConvertParams) -> anyhow::Result<()> {
    let name = file_name(&params.input)?;
    let (stem, ext) = split_extension(name);
    let data = fs::read(&params.input).with_context(|| format!("reading {}", params.input.display()))?;

    match ext.to_ascii_lowercase().as_str() {
        "scr" => {
            let decoded = ScrFormat::decode(&data).context("decoding script")?;
            fs::write(&params.output, decoded)?;
        }
        "abm" => {
            let content = AbmFormat::decode(Cursor::new(&data), stem).context("decoding ABM image")?;
            if matches!(content, AbmContent::NotImplemented | AbmContent::Unknown) {
                bail!("unsupported ABM variant in {}", params.input.display());
            }
            // Single bitmaps and animation frames land in the output directory.
            fs::create_dir_all(&params.output)?;
            write_decoded_abm(&content, &params.output, stem).context("writing decoded image")?;
        }
        "msk" => {
            fs::write(&params.output, data)?;
        }
        _ => bail!("don't know how to decode .{} files", ext),
    }

    println!("Decoded {} -> {}", params.input.display(), params.output.display());
    Ok(())
}

fn encode_file(params: &ConvertParams) -> anyhow::Result<()> {
    let name = file_name(&params.input)?;
    let (_, ext) = split_extension(name);
    let data = fs::read(&params.input).with_context(|| format!("reading {}", params.input.display()))?;

    if !ext.eq_ignore_ascii_case("txt") {
        bail!("only .txt scripts can be encoded (got .{})", ext);
    }

    let encoded = ScrFormat::encode(&data).context("encoding script")?;
    fs::write(&params.output, encoded)?;

    println!("Encoded {} -> {}", params.input.display(), params.output.display());
    Ok(())
}

fn file_name(path: &Path) -> anyhow::Result<&str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("invalid input path {}", path.display()))
}
