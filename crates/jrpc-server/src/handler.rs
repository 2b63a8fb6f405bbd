//! Typed method handlers and their type-erased form.
//!
//! [`Handler`] and [`ContextHandler`] are implemented for async closures and
//! functions of up to eight positional arguments. The registry erases them
//! behind [`RpcMethod`], which binds raw params eagerly and hands back the
//! invocation as a boxed future.

use std::future::Future;
use std::marker::PhantomData;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::context::RequestContext;
use crate::params::{BindError, FromParams};
use crate::returns::{IntoReturns, Outcome};
use crate::signature::Signature;

/// A method without a context parameter.
pub trait Handler<Args>: Send + Sync + 'static {
    type Output: IntoReturns;

    fn call(&self, args: Args) -> BoxFuture<'static, Self::Output>;
}

/// A method whose first parameter is the [`RequestContext`].
pub trait ContextHandler<Args>: Send + Sync + 'static {
    type Output: IntoReturns;

    fn call(&self, ctx: RequestContext, args: Args) -> BoxFuture<'static, Self::Output>;
}

macro_rules! impl_handlers {
    ($($ty:ident),*) => {
        impl<Func, Fut, $($ty,)*> Handler<($($ty,)*)> for Func
        where
            Func: Fn($($ty),*) -> Fut + Send + Sync + 'static,
            Fut: Future + Send + 'static,
            Fut::Output: IntoReturns,
            $($ty: Send + 'static,)*
        {
            type Output = Fut::Output;

            #[allow(non_snake_case)]
            fn call(&self, args: ($($ty,)*)) -> BoxFuture<'static, Self::Output> {
                let ($($ty,)*) = args;
                (self)($($ty),*).boxed()
            }
        }

        impl<Func, Fut, $($ty,)*> ContextHandler<($($ty,)*)> for Func
        where
            Func: Fn(RequestContext, $($ty),*) -> Fut + Send + Sync + 'static,
            Fut: Future + Send + 'static,
            Fut::Output: IntoReturns,
            $($ty: Send + 'static,)*
        {
            type Output = Fut::Output;

            #[allow(non_snake_case)]
            fn call(&self, ctx: RequestContext, args: ($($ty,)*)) -> BoxFuture<'static, Self::Output> {
                let ($($ty,)*) = args;
                (self)(ctx, $($ty),*).boxed()
            }
        }
    };
}

impl_handlers!();
impl_handlers!(A);
impl_handlers!(A, B);
impl_handlers!(A, B, C);
impl_handlers!(A, B, C, D);
impl_handlers!(A, B, C, D, E);
impl_handlers!(A, B, C, D, E, F);
impl_handlers!(A, B, C, D, E, F, G);
impl_handlers!(A, B, C, D, E, F, G, H);

/// Type-erased registered method.
pub trait RpcMethod: Send + Sync {
    fn signature(&self) -> &Signature;

    /// Decode `params` into the declared argument types and prepare the call.
    ///
    /// `params` already passed the arity check. The returned future runs the
    /// method and converts its return into an [`Outcome`].
    fn bind(
        &self,
        ctx: RequestContext,
        params: Vec<Value>,
    ) -> Result<BoxFuture<'static, Outcome>, BindError>;
}

pub(crate) struct PlainMethod<F, Args> {
    signature: Signature,
    handler: F,
    _args: PhantomData<fn() -> Args>,
}

impl<F, Args> PlainMethod<F, Args>
where
    F: Handler<Args>,
    Args: FromParams,
{
    pub(crate) fn new(name: String, handler: F) -> Self {
        let signature = Signature::new(
            name,
            Args::param_types(),
            F::Output::return_types(),
            false,
            F::Output::last_is_error(),
        );
        Self {
            signature,
            handler,
            _args: PhantomData,
        }
    }
}

impl<F, Args> RpcMethod for PlainMethod<F, Args>
where
    F: Handler<Args>,
    Args: FromParams,
{
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn bind(
        &self,
        _ctx: RequestContext,
        params: Vec<Value>,
    ) -> Result<BoxFuture<'static, Outcome>, BindError> {
        let args = Args::from_params(params)?;
        Ok(self.handler.call(args).map(IntoReturns::into_outcome).boxed())
    }
}

pub(crate) struct ContextMethod<F, Args> {
    signature: Signature,
    handler: F,
    _args: PhantomData<fn() -> Args>,
}

impl<F, Args> ContextMethod<F, Args>
where
    F: ContextHandler<Args>,
    Args: FromParams,
{
    pub(crate) fn new(name: String, handler: F) -> Self {
        let signature = Signature::new(
            name,
            Args::param_types(),
            F::Output::return_types(),
            true,
            F::Output::last_is_error(),
        );
        Self {
            signature,
            handler,
            _args: PhantomData,
        }
    }
}

impl<F, Args> RpcMethod for ContextMethod<F, Args>
where
    F: ContextHandler<Args>,
    Args: FromParams,
{
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn bind(
        &self,
        ctx: RequestContext,
        params: Vec<Value>,
    ) -> Result<BoxFuture<'static, Outcome>, BindError> {
        let args = Args::from_params(params)?;
        Ok(self.handler.call(ctx, args).map(IntoReturns::into_outcome).boxed())
    }
}
