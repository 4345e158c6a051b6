// Demo binary for the mendpool library - the actual library is in lib.rs

use mendpool::{PoolConfig, Repairable, ResourcePool};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

struct Conn {
    id: u32,
    repairs: Arc<AtomicUsize>,
}

impl Repairable for Conn {
    fn repair(&mut self) -> bool {
        self.repairs.fetch_add(1, Ordering::Relaxed);
        true
    }
}

fn main() {
    println!("=== mendpool demo ===");

    let repairs = Arc::new(AtomicUsize::new(0));
    let pool = ResourcePool::with_config(
        PoolConfig::new().with_repair_interval(Duration::from_millis(50)),
    );
    for id in 0..3 {
        pool.add(Conn {
            id,
            repairs: Arc::clone(&repairs),
        });
    }

    {
        let conn = pool.acquire(None).expect("pool was just populated");
        println!("acquired connection {}", conn.id);
        conn.invalidate();
    }
    println!("broken connections: {}", pool.broken_count());

    // Give the repair worker a couple of cycles to restore service.
    thread::sleep(Duration::from_millis(200));
    println!("repair attempts:    {}", repairs.load(Ordering::Relaxed));
    println!("idle connections:   {}", pool.idle_count());
}
