use std::fmt::{Debug, Display};

use site_backend::{
    broadcast_worker::run_worker_until_stopped, configuration::get_configuration,
    startup::Application, telemetry,
};
use tokio::task::JoinError;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Set up tracing
    let subscriber = telemetry::get_subscriber("site_backend=info,info".into(), std::io::stdout);
    telemetry::init_subscriber(subscriber);

    // Set up configuration
    let configuration = get_configuration().expect("failed to read configuration");

    let application = Application::build(configuration).await?;
    let broadcast_worker = run_worker_until_stopped(application.broadcaster(), application.schedule());

    let application_task = tokio::spawn(application.run_until_stopped());
    let broadcast_worker_task = tokio::spawn(broadcast_worker);

    tokio::select! {
        o = application_task => report_exit("API", o),
        o = broadcast_worker_task => report_exit("Daily broadcast worker", o),
    };

    Ok(())
}

fn report_exit(task_name: &str, outcome: Result<Result<(), impl Debug + Display>, JoinError>) {
    match outcome {
        Ok(Ok(())) => {
            tracing::info!("{} has exited", task_name)
        }
        Ok(Err(e)) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "{} failed",
                task_name
            )
        }
        Err(e) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "{} task failed to complete",
                task_name
            )
        }
    }
}
