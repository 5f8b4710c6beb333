use rollup::{AggregationMethod, Database, Duration, MetricKey, Retention, Value};
use std::path::Path;
use std::time::Instant;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn main() -> rollup::Result<()> {
    env_logger::builder()
        .filter_module("lsm_tree", log::LevelFilter::Warn)
        .filter_module("fjall", log::LevelFilter::Info)
        .filter_module("rollup", log::LevelFilter::Debug)
        .parse_default_env()
        .init();

    let path = Path::new(".testy");

    if path.try_exists()? {
        std::fs::remove_dir_all(path)?;
    }

    let db = Database::builder().cache_size_mib(128).open(path)?;

    let retentions = [
        Retention::new(1, Duration::hours(6)),
        Retention::new(Duration::minutes(1), 60 * 24 * 7),
        Retention::new(Duration::minutes(10), 6 * 24 * 90),
    ];

    let methods = [
        AggregationMethod::Average,
        AggregationMethod::Min,
        AggregationMethod::Max,
        AggregationMethod::Last,
    ];

    let hosts = ["h-0.cpu", "h-1.cpu", "h-2.cpu"];

    for host in hosts {
        db.register(MetricKey::try_from(host)?, &retentions, &methods)?;
    }

    let start = Instant::now();
    let now = rollup::timestamp();
    let from = now - Duration::hours(6);

    {
        use rand::Rng;

        let mut rng = rand::thread_rng();

        for host in hosts {
            for (idx, ts) in (from..now).enumerate() {
                // NOTE: Idle for the first half, busy afterwards
                let base_value: Value = if ts < from + Duration::hours(3) {
                    10.0
                } else {
                    75.0
                };

                let value = (base_value + rng.gen_range(-5.0..5.0)).max(0.0);

                db.write(host, ts, value)?;

                if idx % 5_000 == 0 {
                    log::info!("[{host}] ingested {idx}");
                }
            }
        }
    }

    log::info!("ingested in {:?}", start.elapsed());

    db.persist()?;

    for host in hosts {
        let span = Duration::minutes(10);

        let sums = db.points(&format!("{host}_sum_{span}"), from, now)?;
        let cnts = db.points(&format!("{host}_cnt_{span}"), from, now)?;
        let maxs = db.points(&format!("{host}_max_{span}"), from, now)?;

        for ((sum, cnt), max) in sums.iter().zip(&cnts).zip(&maxs) {
            log::info!(
                "[{host}] {}: avg={:.2} max={:.2}",
                sum.ts,
                sum.value / cnt.value,
                max.value,
            );
        }
    }

    Ok(())
}
