/*
This file is part of the OpenMap tools library.
Created: 17/10/2026
Last Modified: 18/10/2026
License: MIT
*/
use openmap_tools::tools::ToolManager;
use std::env;
use std::io::Error;
use std::path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    match run() {
        Ok(()) => {}
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::from_default_env().add_directive(
        format!("openmap_tools={}", level)
            .parse()
            .unwrap_or_else(|_| tracing::level_filters::LevelFilter::INFO.into()),
    );
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run() -> Result<(), Error> {
    let sep: &str = &path::MAIN_SEPARATOR.to_string();
    let mut working_dir = String::new();
    let mut tool_name = String::new();
    let mut run_tool = false;
    let mut tool_help = false;
    let mut tool_parameters = false;
    let mut list_tools = false;
    let mut tool_args_vec: Vec<String> = vec![];
    let mut verbose = false;
    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        help();
        return Ok(());
    }
    for arg in args.iter().skip(1) {
        if arg.starts_with("-h") || arg.starts_with("--help") {
            help();
            return Ok(());
        } else if arg.starts_with("-cd") || arg.starts_with("--cd") || arg.starts_with("--wd") {
            let mut v = arg
                .replace("--cd", "")
                .replace("--wd", "")
                .replace("-cd", "")
                .replace('\"', "")
                .replace('\'', "");
            if v.starts_with('=') {
                v = v[1..v.len()].to_string();
            }
            if !v.ends_with(sep) {
                v.push_str(sep);
            }
            working_dir = v.to_string();
        } else if arg.starts_with("-run") || arg.starts_with("--run") || arg.starts_with("-r=") || arg == "-r" {
            let mut v = arg
                .replace("--run", "")
                .replace("-run", "")
                .replace("-r", "")
                .replace('\"', "")
                .replace('\'', "");
            if v.starts_with('=') {
                v = v[1..v.len()].to_string();
            }
            tool_name = v;
            run_tool = true;
        } else if arg.starts_with("-toolhelp") || arg.starts_with("--toolhelp") {
            let mut v = arg
                .replace("--toolhelp", "")
                .replace("-toolhelp", "")
                .replace('\"', "")
                .replace('\'', "");
            if v.starts_with('=') {
                v = v[1..v.len()].to_string();
            }
            tool_name = v;
            tool_help = true;
        } else if arg.starts_with("-toolparameters") || arg.starts_with("--toolparameters") {
            let mut v = arg
                .replace("--toolparameters", "")
                .replace("-toolparameters", "")
                .replace('\"', "")
                .replace('\'', "");
            if v.starts_with('=') {
                v = v[1..v.len()].to_string();
            }
            tool_name = v;
            tool_parameters = true;
        } else if arg.starts_with("-listtools") || arg.starts_with("--listtools") {
            list_tools = true;
        } else if arg.starts_with("-license")
            || arg.starts_with("-licence")
            || arg.starts_with("--license")
            || arg.starts_with("--licence")
            || arg == "-l"
        {
            license();
            return Ok(());
        } else if arg.starts_with("-version") || arg.starts_with("--version") {
            version();
            return Ok(());
        } else if arg == "-v" || arg == "--verbose" {
            verbose = true;
        } else if arg.starts_with('-') {
            // it's an arg to be fed to the tool
            tool_args_vec.push(arg.trim().to_string());
        }
    }

    init_logging(verbose);

    if !working_dir.is_empty() && !working_dir.ends_with(sep) {
        working_dir.push_str(sep);
    }
    let tm = ToolManager::new(&working_dir, &verbose)?;
    if run_tool {
        return tm.run_tool(tool_name, tool_args_vec);
    } else if tool_help {
        return tm.tool_help(tool_name);
    } else if tool_parameters {
        return tm.tool_parameters(tool_name);
    } else if list_tools {
        tm.list_tools();
    }

    Ok(())
}

fn help() {
    let mut ext = "";
    if cfg!(target_os = "windows") {
        ext = ".exe";
    }

    let exe_name = &format!("openmap_tools{}", ext);
    let sep: String = path::MAIN_SEPARATOR.to_string();
    let s = "openmap_tools Help

The following commands are recognized:
--cd, --wd       Changes the working directory; used in conjunction with --run flag.
-l, --license    Prints the openmap_tools license.
--listtools      Lists all available tools.
-r, --run        Runs a tool; used in conjuction with --wd flag; -r=\"ExportShapefile\".
--toolhelp       Prints the help associated with a tool; --toolhelp=\"ExportShapefile\".
--toolparameters Prints the parameters (in json form) for a specific tool.
-v               Verbose mode; also raises the log level to debug.
--version        Prints the version information.
-h, --help       Prints help information.

Log output goes to stderr and can be filtered with RUST_LOG.

Example Usage:
>> .*EXE_NAME -r=ExportShapefile -v --wd=\"*path*to*data*\" -i=roads.json -o=roads.shp
"
    .replace('*', &sep)
    .replace("EXE_NAME", exe_name);
    println!("{}", s);
}

fn license() {
    let license_text = "openmap_tools License

Permission is hereby granted, free of charge, to any person obtaining a copy of this software and
associated documentation files (the \"Software\"), to deal in the Software without restriction,
including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense,
and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so,
subject to the following conditions:

The above copyright notice and this permission notice shall be included in all copies or substantial
portions of the Software.

THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT
NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES
OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.";
    println!("{}", license_text);
}

fn version() {
    const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");
    println!("openmap_tools v{}", VERSION.unwrap_or("unknown"));
}
