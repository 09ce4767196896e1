//! Example: Rendering a mindmap from a service payload
//!
//! This example demonstrates the basic workflow of:
//! 1. Creating a MindmapBuilder with default configuration
//! 2. Decoding and normalizing a JSON payload into a canonical tree
//! 3. Rendering the tree to SVG with a provenance caption

use chrono::Utc;

use mindmap::{MindmapBuilder, render::Caption};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A payload in the shape the summarization service returns
    let source = r#"{
        "mindmap": {
            "Ownership": ["Moves", "Borrowing", "Lifetimes"],
            "Traits": ["Generics", "Trait objects"],
            "Concurrency": ["Threads", "Channels", "Async"]
        }
    }"#;

    let builder = MindmapBuilder::default();

    println!("Parsing payload...");
    let tree = builder.parse(source)?;

    println!("Number of nodes: {}", tree.node_count());
    println!("Depth: {}", tree.max_depth());
    print!("{}", tree.to_outline());

    println!("\nRendering to SVG...");
    let caption = Caption::new("gemini", Utc::now());
    let svg = builder.render_svg(&tree, Some(&caption))?;
    println!("SVG length: {} bytes", svg.len());

    let output_path = "from_payload_output.svg";
    std::fs::write(output_path, &svg)?;
    println!("SVG written to: {}", output_path);

    Ok(())
}
