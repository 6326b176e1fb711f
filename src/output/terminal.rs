// Colored terminal output for finished labeling runs.

use colored::Colorize;

use crate::record::TopicLabels;

/// Display the labeled topics as a table, one row per topic.
pub fn display_labels(record: &TopicLabels) {
    if record.is_empty() {
        println!("No topics labeled.");
        return;
    }

    println!(
        "\n{}",
        format!(
            "=== Topic Labels ({} topics, {}) ===",
            record.len(),
            record.model
        )
        .bold()
    );
    println!();

    println!(
        "  {:>4}  {:<36} {}",
        "#".dimmed(),
        "Label".dimmed(),
        "Top terms".dimmed()
    );
    println!("  {}", "-".repeat(78).dimmed());

    for i in 0..record.len() {
        let terms_preview = super::truncate_chars(&record.terms[i].join(", "), 36);
        if record.labels[i].is_empty() {
            println!(
                "  {:>4}. {:<36} {}",
                i + 1,
                "(no label)".dimmed(),
                terms_preview.dimmed()
            );
        } else {
            println!(
                "  {:>4}. {:<36} {}",
                i + 1,
                record.labels[i].bold(),
                terms_preview.dimmed()
            );
        }
    }

    println!();

    let unlabeled = record.labels.iter().filter(|l| l.is_empty()).count();
    if unlabeled > 0 {
        println!(
            "  {} {} topic(s) without a label (aborted run or empty output)",
            "!".yellow(),
            unlabeled
        );
    }
    println!("  Elapsed: {:.2} minutes", record.minutes_elapsed);
}
