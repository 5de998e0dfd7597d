//! `vedaguru topics`: List the catalog.

use vedaguru_prompts::catalog;
use vedaguru_prompts::guidance;

pub fn run(only: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let categories: Vec<_> = match only {
        Some(id) => vec![catalog::category(id).ok_or_else(|| format!("Unknown category: {id}"))?],
        None => catalog::categories().iter().collect(),
    };

    for category in categories {
        println!("{} ({})", category.name, category.id);
        for topic in category.topic_infos() {
            let guided = guidance::resolve(category.id, topic.id, vedaguru_core::TopicMatching::Strict).is_some();
            let marker = if guided { " *" } else { "" };
            match topic.subcategory_id {
                Some(sub) => println!("  {:<22} {} [{sub}]{marker}", topic.id, topic.name),
                None => println!("  {:<22} {}{marker}", topic.id, topic.name),
            }
        }
        println!();
    }
    println!("* has specialized guidance");
    Ok(())
}
