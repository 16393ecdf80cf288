use crate::{
    configuration::Settings,
    request_id::{MakeRequestUuid, MakeSpanWithRequestId},
    routes,
};

use std::net::{SocketAddr, TcpListener};

use axum::{routing, AddExtensionLayer, Router};
use tower::ServiceBuilder;
use tower_http::{trace::TraceLayer, ServiceBuilderExt};
use tracing::Level;

pub struct Application {
    app: Router,
    listener: TcpListener,
    address: SocketAddr,
}

impl Application {
    pub fn build(settings: Settings) -> std::io::Result<Self> {
        let connect_options = settings.database.connect_options();

        let middleware = ServiceBuilder::new()
            .set_x_request_id(MakeRequestUuid)
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(MakeSpanWithRequestId::default().level(Level::INFO))
                    .on_failure(()),
            )
            .propagate_x_request_id()
            .layer(AddExtensionLayer::new(connect_options))
            .into_inner();

        let app = Router::new()
            .route("/health", routing::get(routes::health::handler))
            .layer(middleware);

        let listener = TcpListener::bind(&settings.application.address())?;
        let address = listener.local_addr()?;

        Ok(Application {
            app,
            listener,
            address,
        })
    }

    pub async fn run(self) -> Result<(), hyper::Error> {
        hyper::Server::from_tcp(self.listener)?
            .serve(self.app.into_make_service())
            .await
    }

    pub fn address(&self) -> String {
        format!("{}", self.address)
    }

    pub fn port(&self) -> u16 {
        self.address.port()
    }
}
