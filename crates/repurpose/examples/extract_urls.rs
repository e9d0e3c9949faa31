//! Example: Extract main content from various pages and display results
//!
//! Run with: cargo run -p repurpose --example extract_urls
//!
//! No generation service is called; this only exercises fetching and
//! extraction.

use repurpose::{ExtractedContent, FetchOptions, FetcherChain, PipelineError, RawDocument};

/// Test case definition
struct TestCase {
    url: &'static str,
    description: &'static str,
    expect_contains: Option<&'static str>,
}

/// Define test cases here
const TEST_CASES: &[TestCase] = &[
    TestCase {
        url: "https://example.com",
        description: "Tiny page (expected to be rejected as too short)",
        expect_contains: None,
    },
    TestCase {
        url: "https://httpbin.org/html",
        description: "Long single-body page",
        expect_contains: Some("Herman Melville"),
    },
    TestCase {
        url: "https://blog.rust-lang.org/",
        description: "Blog index",
        expect_contains: Some("Rust"),
    },
];

#[tokio::main]
async fn main() {
    println!("Repurpose Extraction Examples");
    println!("=============================\n");

    let chain = FetcherChain::with_defaults(&[], true, FetchOptions::default());
    let mut passed = 0;
    let mut failed = 0;

    for (i, case) in TEST_CASES.iter().enumerate() {
        println!("{}. {}", i + 1, case.description);
        println!("   URL: {}", case.url);

        let result = match chain.fetch_html(case.url).await {
            Ok(html) => repurpose::extract_document(&RawDocument::html(html, case.url))
                .map_err(PipelineError::from),
            Err(e) => Err(PipelineError::from(e)),
        };

        match (result, case.expect_contains) {
            (Ok(content), expected) => {
                print_summary(&content);
                if expected.map_or(true, |text| content.text.contains(text)) {
                    println!("   ✓ PASS\n");
                    passed += 1;
                } else {
                    println!("   ✗ FAIL (expected text not found)\n");
                    failed += 1;
                }
            }
            (Err(e), None) => {
                println!("   Rejected: {}", e);
                println!("   ✓ PASS\n");
                passed += 1;
            }
            (Err(e), Some(_)) => {
                println!("   Error: {}", e);
                println!("   ✗ FAIL\n");
                failed += 1;
            }
        }
    }

    println!("=============================");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed > 0 {
        std::process::exit(1);
    }
}

fn print_summary(content: &ExtractedContent) {
    println!("   Selection: {:?}", content.selection);
    println!("   Characters: {}", content.char_count);
    if content.truncated {
        println!("   Truncated: yes");
    }
    let preview = content.text.chars().take(100).collect::<String>();
    println!(
        "   Preview: {}{}",
        preview,
        if content.char_count > 100 { "..." } else { "" }
    );
}
