use crate::tcp;
use hyper::body::{Body, Incoming};
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use std::convert::Infallible;
use std::future::Future;
use std::io;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Accept connections until interrupted, dispatching every request on them to
/// `handle_req`.
///
/// Returns `Ok(())` once ctrl-c is received. Connection tasks hold no handle
/// back to this loop; whatever is still in flight is abandoned when the
/// runtime shuts down.
pub async fn run_until_interrupted<S, F, B>(
    mut listener: TcpListener,
    state: S,
    handle_req: F,
) -> Result<(), io::Error>
where
    S: Send + Sync + 'static,
    F: for<'s> ServiceFn<'s, Request<Incoming>, S, Response<B>> + Copy + Send + 'static,
    B: Body + Send + 'static,
    <B as Body>::Data: Send,
    <B as Body>::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let state = Arc::new(state);

    // Registered once, outside the loop: a signal arriving between accepts
    // must not be lost.
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    loop {
        let tcp = tokio::select! {
            conn = tcp::accept(&mut listener) => conn?,
            interrupt = &mut interrupt => {
                interrupt?;
                return Ok(());
            }
        };
        let io = TokioIo::new(tcp);

        let state = Arc::clone(&state);
        tokio::spawn(async move {
            let serve = service_fn(move |req| {
                let state = Arc::clone(&state);
                async move { Ok::<_, Infallible>(handle_req(req, &state).await) }
            });

            if let Err(e) = auto::Builder::new(TokioExecutor::new())
                .serve_connection(io, serve)
                .await
            {
                log::error!("Error serving connection: {}", e);
            }
        });
    }
}

// The handler's future borrows the shared state, so its bound would need
// higher-kinded lifetimes to write directly:
// ```
// where
//     F: for<'s> FnOnce(Request<Body>, &'s S) -> Fut<'s>
//     Fut<'s>: Future<Output = R> + 's
// ```
// That isn't expressible today. A helper trait can carry the future type,
// with a blanket impl covering every matching function.
pub trait ServiceFn<'s, T, S, R>
where
    Self: FnOnce(T, &'s S) -> Self::Fut,
    Self::Fut: Future<Output = R> + Send + 's,
    S: 's,
{
    type Fut;
}

impl<'s, T, S, R, F, Fut> ServiceFn<'s, T, S, R> for F
where
    F: FnOnce(T, &'s S) -> Fut,
    Fut: Future<Output = R> + Send + 's,
    S: 's,
{
    type Fut = Fut;
}
