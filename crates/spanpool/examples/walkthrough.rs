//! spanpool walkthrough: allocate, free, resize and inspect a small pool.
//!
//! Run with:
//!   RUST_LOG=spanpool=trace cargo run -p spanpool --example walkthrough

use spanpool::{Pool, PoolConfig};
use tracing_subscriber::EnvFilter;

fn show(step: &str, pool: &Pool) {
    println!("── {step}");
    println!("   {}", pool.active_report());
    println!("   {}", pool.available_report());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut pool = Pool::with_config(PoolConfig::new(100).zero_on_alloc(true))?;
    show("created", &pool);

    let a = pool.allocate(30)?;
    let b = pool.allocate(20)?;
    let c = pool.allocate(10)?;
    show("allocated 30, 20 and 10", &pool);

    pool.free(a)?;
    show("freed the first region", &pool);

    pool.bytes_mut(b).ok_or("region vanished")?.fill(b'x');
    let b = pool.resize(b, 18)?;
    show("shrank the second region in place", &pool);

    let b = pool.resize(b, 35)?;
    show("grew it past its trailing gap (relocated)", &pool);
    let moved = pool.bytes(b).ok_or("region vanished")?;
    println!("   first bytes after move: {:?}", &moved[..4]);

    if let Err(e) = pool.allocate(90) {
        println!("── allocate(90) refused: {e}");
    }

    let mut pool = match pool.destroy() {
        Ok(()) => return Ok(()),
        Err(e) => {
            println!("── destroy refused: {e}");
            e.into_pool()
        }
    };
    pool.free(b)?;
    pool.free(c)?;
    pool.destroy()?;
    println!("── destroyed");
    Ok(())
}
