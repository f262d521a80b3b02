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

use std::path::PathBuf;

use bpaf::*;

#[derive(Clone, Debug)]
pub(crate) enum Command {
    Version,
    Extract(ExtractParams),
    Repack(RepackParams),
    Decode(ConvertParams),
    Encode(ConvertParams),
}

#[derive(Clone, Debug)]
pub(crate) struct ExtractParams {
    pub nodecode: bool,
    pub archive:  PathBuf,
    pub output:   PathBuf,
}

#[derive(Clone, Debug)]
pub(crate) struct RepackParams {
    pub noencode: bool,
    pub input:    PathBuf,
    pub archive:  PathBuf,
}

#[derive(Clone, Debug)]
pub(crate) struct ConvertParams {
    pub input:  PathBuf,
    pub output: PathBuf,
}

fn extract_parser() -> impl Parser<ExtractParams> {
    let nodecode = long("nodecode")
        .help("Write entries verbatim, without decoding scripts or images")
        .switch();
    let archive = positional::<PathBuf>("ARCHIVE").help("Path to the AOS archive");
    let output = positional::<PathBuf>("OUTPUT_DIR").help("Directory to extract into");

    construct!(ExtractParams {
        nodecode,
        archive,
        output
    })
}

fn repack_parser() -> impl Parser<RepackParams> {
    let noencode = long("noencode")
        .help("Store files verbatim, without re-encoding scripts")
        .switch();
    let input = positional::<PathBuf>("INPUT_DIR").help("Directory of assets to pack");
    let archive = positional::<PathBuf>("ARCHIVE").help("Path of the archive to create");

    construct!(RepackParams {
        noencode,
        input,
        archive
    })
}

fn convert_parser() -> impl Parser<ConvertParams> {
    let input = positional::<PathBuf>("INPUT").help("Path to input file");
    let output = positional::<PathBuf>("OUTPUT").help("Path to output file or directory");

    construct!(ConvertParams { input, output })
}

pub(crate) fn command_parser() -> OptionParser<Command> {
    let version = pure(Command::Version)
        .to_options()
        .command("version")
        .help("Display version information and exit");

    let extract = construct!(Command::Extract(extract_parser()))
        .to_options()
        .command("extract")
        .help("Extract an AOS archive into a directory of decoded assets");

    let repack = construct!(Command::Repack(repack_parser()))
        .to_options()
        .command("repack")
        .help("Pack a directory of assets into an AOS archive");

    let decode = construct!(Command::Decode(convert_parser()))
        .to_options()
        .command("decode")
        .help("Decode a single script or image file");

    let encode = construct!(Command::Encode(convert_parser()))
        .to_options()
        .command("encode")
        .help("Encode a single script file");

    construct!([version, extract, repack, decode, encode])
        .to_options()
        .descr("aostool - unpack and repack AOS visual-novel archives")
}
