use period::adapter::memory::InMemoryRecordStore;
use period::adapter::mongo::MongoRecordStore;
use period::{Condition, Filter, PeriodFilter, PeriodPreset, is_date_in_period, sample_records};
use port::RecordStore;
use settings::{ReportSettings, Settings};

mod core;
mod period;
pub mod port;
mod settings;

#[tokio::main(flavor = "multi_thread")]
pub async fn main() {
    let settings = Settings::new().expect("Error reading configuration");

    settings
        .monitoring
        .init(settings.app_debug)
        .expect("Error initializing monitoring");

    if let Err(e) = run(&settings).await {
        tracing::error!("Period report failed: {:?}", e);
        std::process::exit(1);
    }
}

async fn run(settings: &Settings) -> anyhow::Result<()> {
    if let Some(api) = &settings.qc_report_api {
        tracing::debug!("QC report API at {}", api);
    }

    if settings.store.offline {
        tracing::info!("Running offline against the sample records");
        let filter = PeriodFilter::new(InMemoryRecordStore::with_records(sample_records()));
        return report(&filter, &settings.report).await;
    }

    let database = settings.database().connect().await?;

    if settings.report.seed_sample_data {
        let seed_database = match settings.master_database() {
            Some(master) => master.connect().await?,
            None => database.clone(),
        };

        PeriodFilter::new(MongoRecordStore::new(&seed_database, &settings.store.collection))
            .create_sample_data()
            .await;
    }

    let filter = PeriodFilter::new(MongoRecordStore::new(&database, &settings.store.collection));
    report(&filter, &settings.report).await
}

async fn report<S: RecordStore>(filter: &PeriodFilter<S>, report: &ReportSettings) -> anyhow::Result<()> {
    let (start, end) = (report.start.as_str(), report.end.as_str());

    let records = match &report.title_pattern {
        Some(pattern) => {
            let conditions = Filter::new().field("title", Condition::regex_ignore_case(pattern));
            filter.find_data_in_period_with_conditions(start, end, conditions).await?
        }
        None => filter.find_data_in_period(start, end).await?,
    };
    let count = filter.count_data_in_period(start, end).await?;

    tracing::info!("Found {} of {} records created from {} to {}", records.len(), count, start, end);
    for record in &records {
        tracing::info!(
            "{} created at {} (in period: {})",
            record.title,
            record.created_at.to_iso_string(),
            is_date_in_period(record.created_at, start, end)
        );
    }

    for annotated in filter.annotate_data_in_period(start, end).await? {
        tracing::debug!("{} in period {}", annotated.record.title, annotated.period_info);
    }

    if let Some(preset) = &report.preset {
        let preset: PeriodPreset = preset.parse()?;
        let count = filter.count_data_in_preset(&preset).await?;
        tracing::info!("{} records in preset {}", count, preset);

        for record in filter.find_data_in_preset(&preset).await? {
            tracing::debug!("{} created at {}", record.title, record.created_at.to_iso_string());
        }
    }

    Ok(())
}
