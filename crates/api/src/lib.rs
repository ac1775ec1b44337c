mod error;
mod job_schedulers;
mod reminder;
mod shared;
mod status;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
use callme_reminder_infra::CallmeContext;
pub use job_schedulers::DueRemindersJob;
use std::net::TcpListener;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    reminder::configure_routes(cfg);
    status::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
    due_reminders_job: DueRemindersJob,
}

impl Application {
    pub async fn new(context: CallmeContext) -> Result<Self, std::io::Error> {
        let (server, port) = Application::configure_server(context.clone()).await?;
        let due_reminders_job = DueRemindersJob::new(context);
        due_reminders_job.start();

        Ok(Self {
            server,
            port,
            due_reminders_job,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    async fn configure_server(context: CallmeContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    /// Serves requests until the server shuts down, then stops the due reminders
    /// job after letting its current tick finish
    pub async fn start(self) -> Result<(), std::io::Error> {
        info!("Listening on port {}", self.port);
        let res = self.server.await;
        self.due_reminders_job.stop().await;
        res
    }
}
