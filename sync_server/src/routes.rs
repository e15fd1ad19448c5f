//! Request handler definitions
//!
//! Define each route and its handler here. Handlers that are more than a few lines go into their own module, so that
//! this one stays easy to scan.
//!
//! Each worker thread processes its requests sequentially, so handlers must never block. Everything that waits on
//! Erply or Voog is async.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use sync_engine::{ProductCatalog, SyncApi};

use crate::{
    config::WebhookConfig,
    data_objects::{JsonResponse, OrderWebhook},
    integrations::WarehouseScoped,
    order_webhook::process_order,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro.
// Each type parameter is listed with its trait bounds, e.g. `impl B: ProductCatalog + Clone, W: ProductCatalog`.
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($param:ident: $bound0:ident $(+ $bound:ident)*),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<$($param,)+>($(core::marker::PhantomData<fn() -> $param>,)+); }
        paste::paste! { impl<$($param,)+> [<$name:camel Route>]<$($param,)+> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($(core::marker::PhantomData::<fn() -> $param>,)+)
            }
        }}
        paste::paste! { impl<$($param,)+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$($param,)+>
        where
            $($param: $bound0 $(+ $bound)* + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<$($param,)+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/healthz")]
pub async fn healthz() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().json(JsonResponse::success())
}

//----------------------------------------------   Voog  ----------------------------------------------------
route!(voog_order_webhook => Post "/voog/order-webhook"
    impl B: ProductCatalog + WarehouseScoped + Clone, W: ProductCatalog + Clone);
/// Receives Voog order notifications and refreshes the stock of every ordered SKU from Erply.
///
/// Failures are reported in the body as `{"ok": false, "error": "..."}` with a 200 status, so that Voog does not
/// keep redelivering an order whose SKUs cannot be refreshed.
pub async fn voog_order_webhook<B, W>(
    body: web::Json<OrderWebhook>,
    back_office: web::Data<B>,
    website: web::Data<W>,
    config: web::Data<WebhookConfig>,
) -> HttpResponse
where
    B: ProductCatalog + WarehouseScoped + Clone,
    W: ProductCatalog + Clone,
{
    let order = body.into_inner();
    trace!("💻️ Received Voog order webhook: {order:?}");
    let back_office = match order.warehouse_id {
        Some(id) => {
            debug!("💻️ Order pins Erply warehouse {id}");
            back_office.for_warehouse(id)
        },
        None => back_office.get_ref().clone(),
    };
    let api = SyncApi::new(back_office, website.get_ref().clone());
    match process_order(&api, &order, &config).await {
        Ok(result) => {
            info!("💻️ Order {:?} processed. Refreshed {} SKU(s)", result.order_id, result.refreshed.len());
            HttpResponse::Ok().json(result)
        },
        Err(e) => {
            warn!("💻️ Could not process order {:?}. {e}", order.order_id);
            HttpResponse::Ok().json(JsonResponse::failure(e))
        },
    }
}
