use std::error::Error;

use sim_lib::flags::SimArgs;
use sim_lib::instruction::decode;
use sim_lib::loader;
use sim_lib::run_wrapper;
use sim_lib::single_cycle::Core;
use sim_lib::snapshot::CoreSnapshot;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

fn setup_logger(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::TRACE
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = SimArgs::from_env_or_exit();
    setup_logger(args.verbose);

    let program = if args.raw {
        loader::load_raw(&args.program, args.base())?
    } else {
        loader::load_elf(&args.program)?
    };

    if args.disassemble {
        for (address, word) in program.rom.iter() {
            println!("{:#010x}:  {:08x}  {}", address, word, decode(word));
        }
        return Ok(());
    }

    let (ram_base, ram_size) = args.ram_window();
    let mut program = program.with_ram(ram_base, ram_size);

    let policy = args.policy();
    let mut core = Core::new(policy.initial_pc.unwrap_or(program.entry));
    if let Some(path) = &args.restore {
        core.restore(&CoreSnapshot::load(path)?);
    }

    let summary = run_wrapper::run_core(&mut core, &mut program, policy);

    println!("pc  = {:#010x}", summary.final_pc);
    for (i, value) in summary.snapshot.registers.iter().enumerate() {
        println!("x{:<2} = {:#010x} ({})", i, value, *value as i32);
    }

    if let Some(path) = &args.dump_state {
        summary.snapshot.save(path)?;
    }

    match summary.halt.as_error() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
