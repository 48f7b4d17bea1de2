use crate::config::Config;
use crate::core::Orchestrator;
use crate::models::AnalysisClass;

pub fn handle_adapters_command(class: Option<String>, details: Option<String>) {
    let config = Config::default();
    let mut orchestrator = Orchestrator::new(&config);
    orchestrator.register_built_in_adapters();
    let registry = orchestrator.registry();

    if let Some(adapter_id) = details {
        if let Some(adapter) = registry.get(&adapter_id) {
            println!("{}", adapter);
        } else {
            eprintln!("Error: Adapter with ID '{}' not found.", adapter_id);
        }
        return;
    }

    let adapters = if let Some(class_str) = &class {
        match class_str.parse::<AnalysisClass>() {
            Ok(class) => {
                println!("\nAvailable adapters for {} analysis:", class);
                registry.get_by_class(class)
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!("Acceptable values: static, dynamic");
                std::process::exit(1);
            }
        }
    } else {
        println!("\nAvailable adapters (Total: {}):", registry.count());
        registry.get_all()
    };

    if adapters.is_empty() {
        println!("No adapters found");
    } else {
        for adapter in adapters {
            println!("({}) - {}: {}", adapter.class(), adapter.id(), adapter.name());
        }
    }
}
