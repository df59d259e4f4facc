use aniext_tools::analyzer::discovery::{best_container, discover_detail, discover_homepage};
use aniext_tools::analyzer::classify_host;
use aniext_tools::{SiteAnalyzer, StaticFetcher};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scraper::Html;
use url::Url;

/// A homepage with a navigation bar, a sidebar and a large card grid
fn sample_homepage(cards: usize) -> String {
    let mut html = String::from(
        r#"<html><body><div class="menu"><a href="/">Home</a><a href="/list">List</a></div>
        <div class="content"><div class="listupd grid">"#,
    );
    for i in 0..cards {
        html.push_str(&format!(
            r#"<article class="bs"><a class="tip" href="/anime/title-{i}"><div class="limit"><img src="/img/{i}.jpg"></div><div class="tt"><h2>Title {i}</h2></div></a></article>"#
        ));
    }
    html.push_str(r#"</div></div><div class="sidebar"><img src="/ad.png"></div></body></html>"#);
    html
}

fn sample_detail_page(episodes: usize) -> String {
    let mut html = String::from(
        r#"<html><body><div class="entry-content">The story follows a young ninja who seeks recognition from his peers and dreams of becoming the leader of his village.</div><ul class="eplister">"#,
    );
    for i in 0..episodes {
        html.push_str(&format!(r#"<li><a href="/title-episode-{i}">Episode {i}</a></li>"#));
    }
    html.push_str("</ul></body></html>");
    html
}

fn bench_container_discovery(c: &mut Criterion) {
    let base = Url::parse("https://anime.example").unwrap();
    let homepage = sample_homepage(48);

    c.bench_function("parse_and_discover_homepage", |b| {
        b.iter(|| {
            let document = Html::parse_document(black_box(&homepage));
            discover_homepage(&document, &base)
        })
    });

    let document = Html::parse_document(&homepage);
    c.bench_function("best_container", |b| {
        b.iter(|| best_container(black_box(&document)).map(|candidate| candidate.score()))
    });
}

fn bench_detail_discovery(c: &mut Criterion) {
    let base = Url::parse("https://anime.example").unwrap();
    let document = Html::parse_document(&sample_detail_page(200));

    c.bench_function("discover_detail", |b| {
        b.iter(|| discover_detail(black_box(&document), &base))
    });
}

fn bench_host_classification(c: &mut Criterion) {
    let sources = [
        "https://dood.to/e/abc",
        "https://streamsb.net/e/1",
        "https://www.mp4upload.com/embed-1.html",
        "https://player.example.com/embed/9",
        "//cdn.example.org/v.mp4",
    ];

    c.bench_function("classify_host", |b| {
        b.iter(|| {
            sources
                .iter()
                .filter_map(|src| classify_host(black_box(src)))
                .count()
        })
    });
}

fn bench_full_analysis(c: &mut Criterion) {
    let fetcher = StaticFetcher::new()
        .with_page("https://anime.example", sample_homepage(24))
        .with_page("https://anime.example/anime/title-0", sample_detail_page(24))
        .with_page(
            "https://anime.example/title-episode-0",
            r#"<iframe src="https://dood.to/e/abc"></iframe><iframe src="https://streamsb.net/e/1"></iframe>"#,
        );

    c.bench_function("run_analysis_static", |b| {
        b.iter(|| {
            tokio_test::block_on(async {
                let mut analyzer = SiteAnalyzer::new("https://anime.example", "naruto", fetcher.clone());
                analyzer.run_analysis().await;
                analyzer.into_results()
            })
        })
    });
}

criterion_group!(
    benches,
    bench_container_discovery,
    bench_detail_discovery,
    bench_host_classification,
    bench_full_analysis
);
criterion_main!(benches);
