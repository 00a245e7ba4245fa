use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use dyna_core::{AllocPolicy, ArrayConfig, DynamicArray};
use rand::Rng;
use std::io::Write;

#[derive(Parser, Debug)]
#[command(name = "dyna")]
#[command(version, about = "Inspect growth, shrink and traversal of a dynamic array", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Abort the process instead of reporting an error when storage cannot be allocated
    #[arg(long, global = true)]
    pub abort_on_oom: bool,

    /// Set verbose level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Push values one by one and report every capacity change
    Grow {
        /// Initial capacity
        #[arg(long, default_value_t = 1)]
        prealloc: usize,

        /// Number of values to push
        #[arg(long, default_value_t = 9)]
        count: usize,

        /// Push random values instead of 0, 1, 2, ...
        #[arg(long)]
        random: bool,
    },

    /// Fill, pop down to `keep` elements, then shrink once
    Shrink {
        #[arg(long, default_value_t = 9)]
        count: usize,

        #[arg(long, default_value_t = 3)]
        keep: usize,
    },

    /// Evaluate the traversal family over a list of values
    Query {
        /// Comma-separated integers
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        values: Vec<i64>,

        #[arg(long, value_enum, default_value_t = Pred::Even)]
        pred: Pred,

        /// Restrict to the half-open window [BEGIN, END)
        #[arg(long, num_args = 2, value_names = ["BEGIN", "END"])]
        range: Option<Vec<usize>>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pred {
    Even,
    Odd,
    Positive,
    Negative,
    Zero,
}

impl Pred {
    pub fn test(self, x: &i64) -> bool {
        match self {
            Pred::Even => x % 2 == 0,
            Pred::Odd => x % 2 != 0,
            Pred::Positive => *x > 0,
            Pred::Negative => *x < 0,
            Pred::Zero => *x == 0,
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn policy(&self) -> AllocPolicy {
        if self.abort_on_oom {
            AllocPolicy::Abort
        } else {
            AllocPolicy::Propagate
        }
    }

    /// Log filter derived from `-v` occurrences.
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

/// Runs one subcommand, writing its report to `out`.
pub fn run(command: &Command, policy: AllocPolicy, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Grow { prealloc, count, random } => grow(*prealloc, *count, *random, policy, out),
        Command::Shrink { count, keep } => shrink(*count, *keep, policy, out),
        Command::Query { values, pred, range } => query(values, *pred, range.as_deref(), policy, out),
    }
}

fn grow(prealloc: usize, count: usize, random: bool, policy: AllocPolicy, out: &mut impl Write) -> Result<()> {
    let config = ArrayConfig::new(prealloc).with_policy(policy);
    let mut arr = DynamicArray::<i64>::from_config(&config).context("Failed to create array")?;
    let mut rng = rand::rng();

    writeln!(out, "capacity {}", arr.capacity())?;
    for i in 0..count {
        let value = if random { rng.random_range(-1000..1000) } else { i as i64 };
        let before = arr.capacity();
        arr.push_back(value)
            .with_context(|| format!("Failed to push element #{i}"))?;
        if arr.capacity() != before {
            writeln!(out, "push #{i}: capacity {before} -> {}", arr.capacity())?;
        }
    }
    log::info!("pushed {count} values");
    writeln!(out, "size {} capacity {} memsize {}", arr.size(), arr.capacity(), arr.memsize())?;
    Ok(())
}

fn shrink(count: usize, keep: usize, policy: AllocPolicy, out: &mut impl Write) -> Result<()> {
    if keep > count {
        bail!("--keep ({keep}) cannot exceed --count ({count})");
    }

    let config = ArrayConfig::new(1).with_policy(policy);
    let mut arr = DynamicArray::<i64>::from_config(&config).context("Failed to create array")?;
    for i in 0..count {
        arr.push_back(i as i64)?;
    }
    while arr.size() > keep {
        arr.pop_back();
    }

    let before = arr.capacity();
    let shrunk = arr.shrink().context("Failed to shrink array")?;
    writeln!(
        out,
        "size {} capacity {before} -> {} ({})",
        arr.size(),
        arr.capacity(),
        if shrunk { "shrunk" } else { "unchanged" }
    )?;
    Ok(())
}

fn query(values: &[i64], pred: Pred, range: Option<&[usize]>, policy: AllocPolicy, out: &mut impl Write) -> Result<()> {
    let config = ArrayConfig::new(values.len()).with_policy(policy);
    let mut arr = DynamicArray::<i64>::from_config(&config).context("Failed to create array")?;
    for &v in values {
        arr.push_back(v)?;
    }

    let test = |x: &i64| pred.test(x);
    let (any, all, none, found) = match range {
        Some(&[begin, end]) => (
            arr.any_of_range(begin, end, test),
            arr.all_of_range(begin, end, test),
            arr.none_of_range(begin, end, test),
            arr.position_if_range(begin, end, test),
        ),
        Some(other) => bail!("--range takes exactly two values, got {}", other.len()),
        None => (arr.any_of(test), arr.all_of(test), arr.none_of(test), arr.position_if(test)),
    };

    writeln!(out, "any_of {any}")?;
    writeln!(out, "all_of {all}")?;
    writeln!(out, "none_of {none}")?;
    match found {
        Some(index) => writeln!(out, "find_if {} at index {index}", arr[index])?,
        None => writeln!(out, "find_if not found")?,
    }
    Ok(())
}
