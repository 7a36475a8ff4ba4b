use tonic_build::manual::{Builder, Method, Service};

fn main() {
    let codec = "tonic_prost::ProstCodec";
    let service = Service::builder()
        .name("FileDownloader")
        .package("filedownload")
        .method(
            Method::builder()
                .name("get_file_info")
                .route_name("GetFileInfo")
                .input_type("crate::proto::FileInfoRequest")
                .output_type("crate::proto::FileInfoResponse")
                .codec_path(codec)
                .build(),
        )
        .method(
            Method::builder()
                .name("download_segment")
                .route_name("DownloadSegment")
                .input_type("crate::proto::SegmentRequest")
                .output_type("crate::proto::SegmentResponse")
                .codec_path(codec)
                .server_streaming()
                .build(),
        )
        .build();

    Builder::new().compile(&[service]);
    println!("cargo:rerun-if-changed=build.rs");
}
