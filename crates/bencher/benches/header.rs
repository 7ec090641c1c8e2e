use std::hint::black_box;
use bencher::{MessageKind, TestCase, TestFile};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use micro_head::codec::{HeaderDecoder, HeaderEncoder};
use micro_head::protocol::HeaderBlock;
use tokio_util::bytes::BytesMut;
use tokio_util::codec::Encoder;

static SMALL_REQUEST: TestFile = TestFile::new("get_small.txt", include_str!("../resources/get_small.txt"));
static LARGE_REQUEST: TestFile = TestFile::new("get_large.txt", include_str!("../resources/get_large.txt"));
static COOKIE_RESPONSE: TestFile = TestFile::new("response_cookies.txt", include_str!("../resources/response_cookies.txt"));

fn create_test_cases() -> Vec<TestCase> {
    vec![
        TestCase::request("small_request", SMALL_REQUEST),
        TestCase::request("large_request", LARGE_REQUEST),
        TestCase::response("cookie_response", COOKIE_RESPONSE),
    ]
}

fn benchmark_header_decoder(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("header_decoder");

    for case in create_test_cases() {
        group.throughput(Throughput::Bytes(case.file().content().len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(case.name()), &case, |b, case| {
            b.iter_batched_ref(
                || (case.connection(), HeaderBlock::new()),
                |(connection, block)| {
                    let complete = HeaderDecoder.decode(connection, block).expect("input should be a valid header block");
                    assert_eq!(block.is_response(), case.kind() == MessageKind::Response);
                    black_box(complete);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn benchmark_header_encoder(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("header_encoder");

    for case in create_test_cases() {
        let block = case.header_block();
        group.throughput(Throughput::Bytes(case.file().content().len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(case.name()), &block, |b, block| {
            b.iter_batched_ref(
                BytesMut::new,
                |bytes_mut| {
                    HeaderEncoder.encode(block, bytes_mut).expect("encoding into memory can't fail");
                    black_box(bytes_mut);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(header, benchmark_header_decoder, benchmark_header_encoder);
criterion_main!(header);
