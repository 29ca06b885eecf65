use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use convokit_image::Image;
use convokit_imgproc::{
    filter::{apply_with_options, kernels::KernelKind, FilterOptions},
    parallel::ExecutionStrategy,
    trace::trace,
};

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("Convolution 3x3");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let image_data = (0..width * height * 3).map(|i| (i % 251) as u8).collect();
        let image = Image::<u8, 3>::new([*width, *height].into(), image_data).unwrap();

        for kind in KernelKind::ALL {
            let kernel = kind.kernel();

            for strategy in [ExecutionStrategy::Serial, ExecutionStrategy::ParallelRows] {
                let options = FilterOptions {
                    strategy,
                    ..Default::default()
                };
                group.bench_with_input(
                    BenchmarkId::new(format!("{kind}_{strategy:?}"), &parameter_string),
                    &image,
                    |b, i| b.iter(|| black_box(apply_with_options(i, &kernel, &options))),
                );
            }
        }

        group.bench_with_input(
            BenchmarkId::new("trace_center", &parameter_string),
            &image,
            |b, i| {
                let kernel = KernelKind::Edge.kernel();
                b.iter(|| black_box(trace(i, &kernel, None)))
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_filters);
criterion_main!(benches);
