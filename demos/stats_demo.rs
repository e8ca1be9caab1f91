use clap::Parser;
use clap::ValueEnum;
use oa_hash::DeletionPolicy;
use oa_hash::HashTable;
use oa_hash::HashTableConfig;
use oa_hash::hash_fns::DEFAULT_PRIMARY;
use oa_hash::hash_fns::universal_hash;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Policy {
    Mark,
    Pack,
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "initial_capacity", default_value_t = 7)]
    initial_capacity: usize,

    #[arg(short = 'n', long = "count", default_value_t = 1000)]
    count: usize,

    #[arg(short = 'l', long = "max_load_factor", default_value_t = 0.7)]
    max_load_factor: f64,

    #[arg(short = 'g', long = "growth_factor", default_value_t = 2.0)]
    growth_factor: f64,

    #[arg(short = 'd', long = "double_hashing")]
    double_hashing: bool,

    #[arg(short = 'p', long = "policy", value_enum, default_value_t = Policy::Mark)]
    policy: Policy,
}

fn main() {
    let args = Args::parse();

    let mut config = HashTableConfig::new(DEFAULT_PRIMARY)
        .initial_capacity(args.initial_capacity)
        .max_load_factor(args.max_load_factor)
        .growth_factor(args.growth_factor)
        .deletion_policy(match args.policy {
            Policy::Mark => DeletionPolicy::Mark,
            Policy::Pack => DeletionPolicy::Pack,
        });
    if args.double_hashing {
        config = config.secondary_hash(universal_hash);
    }

    let mut table: HashTable<usize> = match HashTable::new(config) {
        Ok(table) => table,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    println!(
        "Created table with {} slots ({:?}, {})",
        table.capacity(),
        args.policy,
        if args.double_hashing {
            "double hashing"
        } else {
            "linear probing"
        }
    );
    println!("Inserting {} keys...", args.count);

    for i in 0..args.count {
        let key = format!("key{i}");
        if let Err(err) = table.insert(key.as_str(), i) {
            eprintln!("insert {key} failed: {err}");
        }
    }
    table.stats().print();
    print_histogram(&table);

    println!("Removing every other key...");
    for i in (0..args.count).step_by(2) {
        let key = format!("key{i}");
        if let Err(err) = table.remove(key.as_str()) {
            eprintln!("remove {key} failed: {err}");
        }
    }

    let mut missing = 0;
    for i in (1..args.count).step_by(2) {
        let key = format!("key{i}");
        if table.find(key.as_str()) != Ok(&i) {
            missing += 1;
        }
    }

    table.stats().print();
    print_histogram(&table);
    println!("Surviving keys not found: {missing}");
}

fn print_histogram(table: &HashTable<usize>) {
    let hist = table.cluster_histogram();
    println!("Cluster lengths:");
    for (len, &clusters) in hist.iter().enumerate().skip(1) {
        if clusters > 0 {
            println!("{len:>5} | {clusters}");
        }
    }
}
