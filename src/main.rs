use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::process;
use std::time::{Duration, Instant};

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use levelwise::apriori::{
    read_transactions, FilterMode, IsTree, ItemCatalog, MinerError, TaTree, TransactionSet,
};

/// Frequent item set miner: level-wise search with minimum absolute
/// support, optionally reduced to maximal or closed sets.
#[derive(Parser, Debug)]
#[command(name = "levelwise", version)]
struct Args {
    /// File to read transactions from, one per line
    infile: String,

    /// Minimum absolute support
    #[arg(allow_hyphen_values = true)]
    minsupp: i64,

    /// File to write item sets to (omit to suppress set output)
    outfile: Option<String>,

    /// Keep only maximal frequent item sets
    #[arg(long, conflicts_with = "closed")]
    maximal: bool,

    /// Keep only closed frequent item sets
    #[arg(long)]
    closed: bool,
}

fn main() {
    process::exit(run());
}

fn run() -> i32 {
    if std::env::args().len() < 2 {
        let _ = Args::command().print_help();
        return 0;
    }
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                ErrorKind::UnknownArgument => -5,
                ErrorKind::NoEquals | ErrorKind::InvalidSubcommand => -6,
                ErrorKind::ValueValidation | ErrorKind::InvalidValue => -8,
                _ => -7,
            };
            let _ = err.print();
            return code;
        }
    };
    match mine(&args) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("\nlevelwise: {err}");
            err.exit_code()
        }
    }
}

fn mine(args: &Args) -> Result<(), MinerError> {
    if args.minsupp <= 0 {
        return Err(MinerError::Support(args.minsupp.to_string()));
    }
    let supp = args.minsupp as usize;

    // Read the transactions.
    eprint!("reading {} ... ", args.infile);
    let timer = Instant::now();
    let file = File::open(&args.infile).map_err(|source| MinerError::FileOpen {
        path: args.infile.clone(),
        source,
    })?;
    let mut catalog = ItemCatalog::new();
    let mut taset = TransactionSet::new();
    read_transactions(BufReader::new(file), &args.infile, &mut catalog, &mut taset)?;
    let tacnt = taset.len();
    eprintln!(
        "[{} item(s), {} transaction(s)] done [{:.2}s].",
        catalog.len(),
        tacnt,
        timer.elapsed().as_secs_f64()
    );

    // Sort and recode the items.
    eprint!("sorting and recoding items ... ");
    let timer = Instant::now();
    let map = catalog.recode(supp);
    taset.recode(&map);
    let n = catalog.len();
    eprintln!("[{} item(s)] done [{:.2}s].", n, timer.elapsed().as_secs_f64());
    if n == 0 || tacnt == 0 {
        return Err(MinerError::NoItems);
    }

    // Compactify the transactions.
    eprint!("creating transaction tree ... ");
    let timer = Instant::now();
    let mut tatree = TaTree::new(&taset);
    let mut build_time = timer.elapsed();
    eprintln!("done [{:.2}s].", build_time.as_secs_f64());

    // Seed the single item supports and search level by level.
    eprint!("checking subsets of size 1");
    let timer = Instant::now();
    let mut ist = IsTree::new(n, supp);
    for item in 0..n {
        ist.seed_item_count(item, catalog.frq(item));
    }
    ist.set_transaction_count(tacnt);

    let mut max = taset.max_len();
    let mut live = n;
    let mut count_time = Duration::ZERO;
    let mut marks = vec![false; n];
    while ist.height() < max {
        let used = ist.mark_used_items(&mut marks);
        max = max.min(used);
        if ist.height() >= used {
            break;
        }
        if !ist.add_level() {
            break;
        }
        eprint!(" {}", ist.height());
        // Rebuild the transaction tree without dead items when the
        // smaller tree is predicted to pay for its construction.
        if used < live
            && (used as f64) * build_time.as_secs_f64()
                < 0.1 * (live as f64) * count_time.as_secs_f64()
        {
            live = used;
            taset.filter_items(&marks);
            let rebuild = Instant::now();
            tatree = TaTree::new(&taset);
            build_time = rebuild.elapsed();
        }
        let count = Instant::now();
        ist.count_tree(&tatree);
        count_time = count.elapsed();
    }
    eprintln!(" done [{:.2}s].", timer.elapsed().as_secs_f64());

    // Filter the item sets.
    let mode = if args.maximal {
        Some(FilterMode::Maximal)
    } else if args.closed {
        Some(FilterMode::Closed)
    } else {
        None
    };
    if let Some(mode) = mode {
        let what = match mode {
            FilterMode::Maximal => "maximal",
            FilterMode::Closed => "closed",
        };
        eprint!("filtering {what} item sets ... ");
        let timer = Instant::now();
        ist.filter(mode);
        eprintln!("done [{:.2}s].", timer.elapsed().as_secs_f64());
    }
    let empty = match mode {
        None => tacnt >= supp,
        Some(FilterMode::Maximal) => false,
        Some(FilterMode::Closed) => !(0..n).any(|item| catalog.frq(item) == tacnt),
    };

    // Write the item sets.
    let out_label = args.outfile.as_deref().unwrap_or("<none>");
    eprint!("writing {out_label} ... ");
    let timer = Instant::now();
    let mut out = match &args.outfile {
        Some(path) => {
            let file = File::create(path).map_err(|source| MinerError::FileOpen {
                path: path.clone(),
                source,
            })?;
            Some((BufWriter::new(file), path.clone()))
        }
        None => None,
    };
    let write_err = |path: &str, source| MinerError::FileWrite {
        path: path.to_string(),
        source,
    };
    if empty {
        if let Some((out, path)) = out.as_mut() {
            writeln!(out, " ({tacnt})").map_err(|e| write_err(path, e))?;
        }
    }
    let mut counts = vec![0usize; ist.height()];
    let mut total = empty as usize;
    for (set, supp) in ist.frequent_sets() {
        counts[set.len() - 1] += 1;
        total += 1;
        if let Some((out, path)) = out.as_mut() {
            for &item in &set {
                write!(out, "{} ", catalog.name(item)).map_err(|e| write_err(path, e))?;
            }
            writeln!(out, "({supp})").map_err(|e| write_err(path, e))?;
        }
    }
    if let Some((out, path)) = out.as_mut() {
        out.flush().map_err(|e| write_err(path, e))?;
    }
    eprintln!("[{} set(s)] done [{:.2}s].", total, timer.elapsed().as_secs_f64());

    // Report the number of item sets per size on stdout.
    let mut depths = counts.len();
    if depths > 0 && counts[depths - 1] == 0 {
        depths -= 1;
    }
    println!("{}", empty as usize);
    for count in &counts[..depths] {
        println!("{count}");
    }
    Ok(())
}
