//! Loopback demo: a proxy talking to a stub in the same process.
//!
//! Run with: `cargo run --example loopback`

use std::sync::Arc;

use camwire::handle::{
    Camera, CameraClient, CameraDeviceCallbacks, CameraDeviceUser, CameraServiceListener,
    ProCameraCallbacks, ProCameraUser, TypedHandle,
};
use camwire::parcel::{Exception, ExceptionCode};
use camwire::registry::CAMERA_SERVICE_TABLE;
use camwire::service::{status, DeviceInfoReply, ServiceResult};
use camwire::transport::LoopbackTransport;
use camwire::{
    CameraService, CameraServiceProxy, CameraServiceStub, DeviceInfo, Facing,
};

/// Toy service: one back camera, one front camera.
struct DemoService;

impl CameraService for DemoService {
    fn device_count(&self) -> ServiceResult<i32> {
        Ok(2)
    }

    fn device_info(&self, device_id: i32) -> ServiceResult<DeviceInfoReply> {
        let info = match device_id {
            0 => Some(DeviceInfo {
                facing: Facing::Back,
                orientation: 90,
            }),
            1 => Some(DeviceInfo {
                facing: Facing::Front,
                orientation: 270,
            }),
            _ => None,
        };
        Ok(DeviceInfoReply {
            status: if info.is_some() {
                status::OK
            } else {
                status::BAD_VALUE
            },
            info,
        })
    }

    fn connect(
        &self,
        client: Option<TypedHandle<CameraClient>>,
        device_id: i32,
        package_name: &str,
        client_uid: i32,
    ) -> ServiceResult<TypedHandle<Camera>> {
        if client.is_none() {
            return Err(Exception::new(
                ExceptionCode::NullReference,
                "connect needs a client callback",
            ));
        }
        tracing::info!(
            "opening device {} for {} (uid {})",
            device_id,
            package_name,
            client_uid
        );
        Ok(TypedHandle::new(0x100 + device_id as u64))
    }

    fn connect_pro(
        &self,
        _callbacks: Option<TypedHandle<ProCameraCallbacks>>,
        _device_id: i32,
        _package_name: &str,
        _client_uid: i32,
    ) -> ServiceResult<TypedHandle<ProCameraUser>> {
        Err(Exception::new(
            ExceptionCode::IllegalState,
            "pro mode not available on this build",
        ))
    }

    fn connect_device(
        &self,
        _callbacks: Option<TypedHandle<CameraDeviceCallbacks>>,
        device_id: i32,
        _package_name: &str,
        _client_uid: i32,
    ) -> ServiceResult<TypedHandle<CameraDeviceUser>> {
        Ok(TypedHandle::new(0x300 + device_id as u64))
    }

    fn add_listener(
        &self,
        listener: Option<TypedHandle<CameraServiceListener>>,
    ) -> ServiceResult<i32> {
        Ok(if listener.is_some() {
            status::OK
        } else {
            status::BAD_VALUE
        })
    }

    fn remove_listener(
        &self,
        _listener: Option<TypedHandle<CameraServiceListener>>,
    ) -> ServiceResult<i32> {
        Ok(status::OK)
    }
}

fn main() -> camwire::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let stub = CameraServiceStub::new(Box::new(DemoService), &CAMERA_SERVICE_TABLE);
    let transport = Arc::new(LoopbackTransport::bind(1, stub));
    let proxy = CameraServiceProxy::new(
        transport.endpoint(),
        transport.clone(),
        &CAMERA_SERVICE_TABLE,
    );

    let count = proxy.device_count()?;
    println!("devices: {count}");

    for device_id in 0..count {
        let reply = proxy.device_info(device_id)?;
        println!("device {device_id}: {:?} (status {})", reply.info, reply.status);
    }

    let client = TypedHandle::<CameraClient>::new(42);
    match proxy.connect(Some(&client), 0, "com.example.demo", 10001)? {
        Some(session) => println!("connected: {:?}", session.raw()),
        None => println!("connect refused"),
    }

    // Pro mode is switched off in DemoService; the exception comes back
    // as an absent session, logged by the proxy.
    match proxy.connect_pro(None, 0, "com.example.demo", 10001)? {
        Some(session) => println!("pro session: {:?}", session.raw()),
        None => println!("pro connect refused"),
    }

    let listener = TypedHandle::<CameraServiceListener>::new(7);
    println!("add_listener: {}", proxy.add_listener(Some(&listener))?);
    println!("remove_listener: {}", proxy.remove_listener(Some(&listener))?);

    Ok(())
}
