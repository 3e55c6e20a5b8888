// {{{ Copyright (c) Paul R. Tagliamonte <paultag@debian.org>, 2024
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE. }}}

#[path = "../cli.rs"]
mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{split_comma_list, Command};
use debrepo::repo::{config::RepoConfig, operations};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    stderrlog::new()
        .module(module_path!())
        .verbosity(cli.base.verbose.log_level_filter() as usize)
        .init()
        .context("failed to initialise logging")?;

    match cli.command {
        Command::Create(opts) => {
            let suites = split_comma_list(&opts.suites);
            let components = split_comma_list(&opts.components)
                .into_iter()
                .map(Into::into)
                .collect::<Vec<_>>();
            operations::create(&opts.root, &suites, &components).context("create failed")?;
        }
        Command::Add(opts) => {
            operations::add(&opts.component_path, &opts.files, opts.link).context("add failed")?;
        }
        Command::Remove(opts) => {
            operations::remove(&opts.component_path, &opts.names).context("remove failed")?;
        }
        Command::Update(opts) => {
            let config_path = cli
                .base
                .config
                .context("update requires --config <path>")?;
            let config = RepoConfig::from_path(&config_path)
                .with_context(|| format!("failed to load {}", config_path.display()))?;
            operations::update(&opts.root, &config).context("update failed")?;
        }
        Command::Sign(opts) => {
            let suites = split_comma_list(&opts.suites);
            operations::sign(&opts.root, &suites).context("sign failed")?;
        }
    }

    Ok(())
}

// vim: foldmethod=marker
