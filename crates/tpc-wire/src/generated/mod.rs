//! Generated from `proto/two_phase_commit.proto`.
//!
//! This module was hand-authored in the style `tonic-build`/`prost-build` would emit; see the
//! crate-level comment in `Cargo.toml` for why it isn't produced by that pipeline directly.

use tonic::codegen::*;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PrepareRequest {
    #[prost(string, tag = "1")]
    pub transaction_id: ::prost::alloc::string::String,
    #[prost(string, repeated, tag = "2")]
    pub operations: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(int32, tag = "3")]
    pub timeout_blocks: i32,
    #[prost(string, tag = "4")]
    pub onchain_recipient: ::prost::alloc::string::String,
    #[prost(uint64, tag = "5")]
    pub onchain_amount: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ::prost::Enumeration)]
#[repr(i32)]
pub enum VoteStatus {
    Ready = 0,
    Abort = 1,
}

impl VoteStatus {
    #[must_use]
    pub fn as_str_name(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::Abort => "ABORT",
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PrepareResponse {
    #[prost(enumeration = "VoteStatus", tag = "1")]
    pub status: i32,
    #[prost(string, tag = "2")]
    pub shard_id: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CommitRequest {
    #[prost(string, tag = "1")]
    pub transaction_id: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AbortRequest {
    #[prost(string, tag = "1")]
    pub transaction_id: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RollbackRequest {
    #[prost(string, tag = "1")]
    pub transaction_id: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OnChainRequest {
    #[prost(string, tag = "1")]
    pub transaction_id: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LockRequest {
    #[prost(string, tag = "1")]
    pub transaction_id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub recipient: ::prost::alloc::string::String,
    #[prost(uint64, tag = "3")]
    pub amount: u64,
    #[prost(uint64, tag = "4")]
    pub deadline: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TxHash {
    #[prost(string, tag = "1")]
    pub hash: ::prost::alloc::string::String,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Empty {}

/// Generated client implementations of `tpc.v1.CoordinatorService`.
pub mod coordinator_service_client {
    use super::*;

    #[derive(Debug, Clone)]
    pub struct CoordinatorServiceClient<T> {
        inner: tonic::client::Grpc<T>,
    }

    impl CoordinatorServiceClient<tonic::transport::Channel> {
        /// # Errors
        /// Returns an error if the endpoint cannot be parsed or the connection fails.
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }

    impl<T> CoordinatorServiceClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::Error: Into<StdError>,
        T::ResponseBody: Body<Data = Bytes> + Send + 'static,
        <T::ResponseBody as Body>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            Self {
                inner: tonic::client::Grpc::new(inner),
            }
        }

        /// # Errors
        /// Returns the `tonic::Status` returned by the remote coordinator.
        pub async fn prepare(
            &mut self,
            request: impl tonic::IntoRequest<super::PrepareRequest>,
        ) -> std::result::Result<
            tonic::Response<tonic::codec::Streaming<super::PrepareResponse>>,
            tonic::Status,
        > {
            self.inner
                .ready()
                .await
                .map_err(|e| tonic::Status::unknown(format!("service was not ready: {e}")))?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/tpc.v1.CoordinatorService/Prepare");
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("tpc.v1.CoordinatorService", "Prepare"));
            self.inner.server_streaming(req, path, codec).await
        }

        /// # Errors
        /// Returns the `tonic::Status` returned by the remote coordinator.
        pub async fn commit(
            &mut self,
            request: impl tonic::IntoRequest<super::CommitRequest>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status> {
            self.inner
                .ready()
                .await
                .map_err(|e| tonic::Status::unknown(format!("service was not ready: {e}")))?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/tpc.v1.CoordinatorService/Commit");
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("tpc.v1.CoordinatorService", "Commit"));
            self.inner.unary(req, path, codec).await
        }

        /// # Errors
        /// Returns the `tonic::Status` returned by the remote coordinator.
        pub async fn abort(
            &mut self,
            request: impl tonic::IntoRequest<super::AbortRequest>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status> {
            self.inner
                .ready()
                .await
                .map_err(|e| tonic::Status::unknown(format!("service was not ready: {e}")))?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/tpc.v1.CoordinatorService/Abort");
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("tpc.v1.CoordinatorService", "Abort"));
            self.inner.unary(req, path, codec).await
        }
    }
}

/// Generated server implementations of `tpc.v1.CoordinatorService`.
pub mod coordinator_service_server {
    use super::*;

    #[async_trait]
    pub trait CoordinatorService: Send + Sync + 'static {
        /// Server streaming response type for the Prepare method.
        type PrepareStream: tokio_stream::Stream<
                Item = std::result::Result<super::PrepareResponse, tonic::Status>,
            > + Send
            + 'static;

        async fn prepare(
            &self,
            request: tonic::Request<super::PrepareRequest>,
        ) -> std::result::Result<tonic::Response<Self::PrepareStream>, tonic::Status>;

        async fn commit(
            &self,
            request: tonic::Request<super::CommitRequest>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status>;

        async fn abort(
            &self,
            request: tonic::Request<super::AbortRequest>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status>;
    }

    #[derive(Debug)]
    pub struct CoordinatorServiceServer<T> {
        inner: Arc<T>,
    }

    impl<T> CoordinatorServiceServer<T> {
        pub fn new(inner: T) -> Self {
            Self {
                inner: Arc::new(inner),
            }
        }
    }

    impl<T> Clone for CoordinatorServiceServer<T> {
        fn clone(&self) -> Self {
            Self {
                inner: Arc::clone(&self.inner),
            }
        }
    }

    impl<T> tonic::server::NamedService for CoordinatorServiceServer<T> {
        const NAME: &'static str = "tpc.v1.CoordinatorService";
    }

    impl<T, B> tonic::codegen::Service<http::Request<B>> for CoordinatorServiceServer<T>
    where
        T: CoordinatorService,
        B: Body + Send + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = std::convert::Infallible;
        type Future = BoxFuture<Self::Response, Self::Error>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            let inner = Arc::clone(&self.inner);
            match req.uri().path() {
                "/tpc.v1.CoordinatorService/Prepare" => {
                    struct PrepareSvc<T: CoordinatorService>(Arc<T>);
                    impl<T: CoordinatorService> tonic::server::ServerStreamingService<super::PrepareRequest>
                        for PrepareSvc<T>
                    {
                        type Response = super::PrepareResponse;
                        type ResponseStream = T::PrepareStream;
                        type Future =
                            BoxFuture<tonic::Response<Self::ResponseStream>, tonic::Status>;

                        fn call(
                            &mut self,
                            request: tonic::Request<super::PrepareRequest>,
                        ) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            Box::pin(async move { inner.prepare(request).await })
                        }
                    }
                    let fut = async move {
                        let method = PrepareSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        Ok(grpc.server_streaming(method, req).await)
                    };
                    Box::pin(fut)
                }
                "/tpc.v1.CoordinatorService/Commit" => {
                    struct CommitSvc<T: CoordinatorService>(Arc<T>);
                    impl<T: CoordinatorService> tonic::server::UnaryService<super::CommitRequest> for CommitSvc<T> {
                        type Response = super::Empty;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;

                        fn call(&mut self, request: tonic::Request<super::CommitRequest>) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            Box::pin(async move { inner.commit(request).await })
                        }
                    }
                    let fut = async move {
                        let method = CommitSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        Ok(grpc.unary(method, req).await)
                    };
                    Box::pin(fut)
                }
                "/tpc.v1.CoordinatorService/Abort" => {
                    struct AbortSvc<T: CoordinatorService>(Arc<T>);
                    impl<T: CoordinatorService> tonic::server::UnaryService<super::AbortRequest> for AbortSvc<T> {
                        type Response = super::Empty;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;

                        fn call(&mut self, request: tonic::Request<super::AbortRequest>) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            Box::pin(async move { inner.abort(request).await })
                        }
                    }
                    let fut = async move {
                        let method = AbortSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        Ok(grpc.unary(method, req).await)
                    };
                    Box::pin(fut)
                }
                _ => Box::pin(async move {
                    Ok(http::Response::builder()
                        .status(200)
                        .header("grpc-status", "12")
                        .header("content-type", "application/grpc")
                        .body(tonic::body::empty_body())
                        .unwrap())
                }),
            }
        }
    }
}

/// Generated client implementations of `tpc.v1.ShardService`.
pub mod shard_service_client {
    use super::*;

    #[derive(Debug, Clone)]
    pub struct ShardServiceClient<T> {
        inner: tonic::client::Grpc<T>,
    }

    impl ShardServiceClient<tonic::transport::Channel> {
        /// # Errors
        /// Returns an error if the endpoint cannot be parsed or the connection fails.
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }

    impl<T> ShardServiceClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::Error: Into<StdError>,
        T::ResponseBody: Body<Data = Bytes> + Send + 'static,
        <T::ResponseBody as Body>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            Self {
                inner: tonic::client::Grpc::new(inner),
            }
        }

        async fn unary_call<Req, Resp>(
            &mut self,
            request: impl tonic::IntoRequest<Req>,
            method_name: &'static str,
            path: &'static str,
        ) -> std::result::Result<tonic::Response<Resp>, tonic::Status>
        where
            Req: prost::Message + 'static,
            Resp: prost::Message + Default + 'static,
        {
            self.inner
                .ready()
                .await
                .map_err(|e| tonic::Status::unknown(format!("service was not ready: {e}")))?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(path);
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("tpc.v1.ShardService", method_name));
            self.inner.unary(req, path, codec).await
        }

        /// # Errors
        /// Returns the `tonic::Status` returned by the remote shard.
        pub async fn prepare(
            &mut self,
            request: impl tonic::IntoRequest<super::PrepareRequest>,
        ) -> std::result::Result<tonic::Response<super::PrepareResponse>, tonic::Status> {
            self.unary_call(request, "Prepare", "/tpc.v1.ShardService/Prepare")
                .await
        }

        /// # Errors
        /// Returns the `tonic::Status` returned by the remote shard.
        pub async fn commit(
            &mut self,
            request: impl tonic::IntoRequest<super::CommitRequest>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status> {
            self.unary_call(request, "Commit", "/tpc.v1.ShardService/Commit")
                .await
        }

        /// # Errors
        /// Returns the `tonic::Status` returned by the remote shard.
        pub async fn abort(
            &mut self,
            request: impl tonic::IntoRequest<super::AbortRequest>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status> {
            self.unary_call(request, "Abort", "/tpc.v1.ShardService/Abort")
                .await
        }

        /// # Errors
        /// Returns the `tonic::Status` returned by the remote shard.
        pub async fn rollback(
            &mut self,
            request: impl tonic::IntoRequest<super::RollbackRequest>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status> {
            self.unary_call(request, "Rollback", "/tpc.v1.ShardService/Rollback")
                .await
        }

        /// # Errors
        /// Returns the `tonic::Status` returned by the remote shard.
        pub async fn lock_on_chain(
            &mut self,
            request: impl tonic::IntoRequest<super::LockRequest>,
        ) -> std::result::Result<tonic::Response<super::TxHash>, tonic::Status> {
            self.unary_call(request, "LockOnChain", "/tpc.v1.ShardService/LockOnChain")
                .await
        }

        /// # Errors
        /// Returns the `tonic::Status` returned by the remote shard.
        pub async fn commit_on_chain(
            &mut self,
            request: impl tonic::IntoRequest<super::OnChainRequest>,
        ) -> std::result::Result<tonic::Response<super::TxHash>, tonic::Status> {
            self.unary_call(
                request,
                "CommitOnChain",
                "/tpc.v1.ShardService/CommitOnChain",
            )
            .await
        }

        /// # Errors
        /// Returns the `tonic::Status` returned by the remote shard.
        pub async fn reclaim_on_chain(
            &mut self,
            request: impl tonic::IntoRequest<super::OnChainRequest>,
        ) -> std::result::Result<tonic::Response<super::TxHash>, tonic::Status> {
            self.unary_call(
                request,
                "ReclaimOnChain",
                "/tpc.v1.ShardService/ReclaimOnChain",
            )
            .await
        }
    }
}

/// Generated server implementations of `tpc.v1.ShardService`.
pub mod shard_service_server {
    use super::*;

    #[async_trait]
    pub trait ShardService: Send + Sync + 'static {
        async fn prepare(
            &self,
            request: tonic::Request<super::PrepareRequest>,
        ) -> std::result::Result<tonic::Response<super::PrepareResponse>, tonic::Status>;

        async fn commit(
            &self,
            request: tonic::Request<super::CommitRequest>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status>;

        async fn abort(
            &self,
            request: tonic::Request<super::AbortRequest>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status>;

        async fn rollback(
            &self,
            request: tonic::Request<super::RollbackRequest>,
        ) -> std::result::Result<tonic::Response<super::Empty>, tonic::Status>;

        async fn lock_on_chain(
            &self,
            request: tonic::Request<super::LockRequest>,
        ) -> std::result::Result<tonic::Response<super::TxHash>, tonic::Status>;

        async fn commit_on_chain(
            &self,
            request: tonic::Request<super::OnChainRequest>,
        ) -> std::result::Result<tonic::Response<super::TxHash>, tonic::Status>;

        async fn reclaim_on_chain(
            &self,
            request: tonic::Request<super::OnChainRequest>,
        ) -> std::result::Result<tonic::Response<super::TxHash>, tonic::Status>;
    }

    #[derive(Debug)]
    pub struct ShardServiceServer<T> {
        inner: Arc<T>,
    }

    impl<T> ShardServiceServer<T> {
        pub fn new(inner: T) -> Self {
            Self {
                inner: Arc::new(inner),
            }
        }
    }

    impl<T> Clone for ShardServiceServer<T> {
        fn clone(&self) -> Self {
            Self {
                inner: Arc::clone(&self.inner),
            }
        }
    }

    impl<T> tonic::server::NamedService for ShardServiceServer<T> {
        const NAME: &'static str = "tpc.v1.ShardService";
    }

    /// Defines one `match` arm of [`Service::call`] below: builds the per-method unary service
    /// wrapper and dispatches it through a fresh `tonic::server::Grpc`.
    macro_rules! unary_arm {
        ($inner:ident, $req:ident, $req_ty:ty, $resp_ty:ty, $method:ident) => {{
            struct MethodSvc<T: ShardService>(Arc<T>);
            impl<T: ShardService> tonic::server::UnaryService<$req_ty> for MethodSvc<T> {
                type Response = $resp_ty;
                type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;

                fn call(&mut self, request: tonic::Request<$req_ty>) -> Self::Future {
                    let inner = Arc::clone(&self.0);
                    Box::pin(async move { inner.$method(request).await })
                }
            }
            let inner = Arc::clone(&$inner);
            let fut = async move {
                let method = MethodSvc(inner);
                let codec = tonic::codec::ProstCodec::default();
                let mut grpc = tonic::server::Grpc::new(codec);
                Ok(grpc.unary(method, $req).await)
            };
            Box::pin(fut)
        }};
    }

    impl<T, B> tonic::codegen::Service<http::Request<B>> for ShardServiceServer<T>
    where
        T: ShardService,
        B: Body + Send + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = std::convert::Infallible;
        type Future = BoxFuture<Self::Response, Self::Error>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            let inner = Arc::clone(&self.inner);
            match req.uri().path() {
                "/tpc.v1.ShardService/Prepare" => {
                    unary_arm!(inner, req, super::PrepareRequest, super::PrepareResponse, prepare)
                }
                "/tpc.v1.ShardService/Commit" => {
                    unary_arm!(inner, req, super::CommitRequest, super::Empty, commit)
                }
                "/tpc.v1.ShardService/Abort" => {
                    unary_arm!(inner, req, super::AbortRequest, super::Empty, abort)
                }
                "/tpc.v1.ShardService/Rollback" => {
                    unary_arm!(inner, req, super::RollbackRequest, super::Empty, rollback)
                }
                "/tpc.v1.ShardService/LockOnChain" => {
                    unary_arm!(inner, req, super::LockRequest, super::TxHash, lock_on_chain)
                }
                "/tpc.v1.ShardService/CommitOnChain" => {
                    unary_arm!(inner, req, super::OnChainRequest, super::TxHash, commit_on_chain)
                }
                "/tpc.v1.ShardService/ReclaimOnChain" => {
                    unary_arm!(
                        inner,
                        req,
                        super::OnChainRequest,
                        super::TxHash,
                        reclaim_on_chain
                    )
                }
                _ => Box::pin(async move {
                    Ok(http::Response::builder()
                        .status(200)
                        .header("grpc-status", "12")
                        .header("content-type", "application/grpc")
                        .body(tonic::body::empty_body())
                        .unwrap())
                }),
            }
        }
    }
}
