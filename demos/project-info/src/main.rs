use argh::FromArgs;
use std::path::PathBuf;

use psproj_data::Project;

#[derive(FromArgs)]
/// Read a PhotoScan/Metashape project and print a per-chunk report
struct Args {
    /// path to the project file (.psx or .psz)
    #[argh(option)]
    project_path: PathBuf,

    /// print the full multi-line report for every chunk
    #[argh(switch)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let project = Project::parse(&args.project_path)?;

    println!("Project: {}", project.source_file.display());
    println!("Format version: {}", project.version);
    println!("Chunks: {}", project.chunk_count());
    println!();

    for (index, chunk) in project.chunks.iter().enumerate() {
        let marker = if Some(index) == project.active {
            " (active)"
        } else {
            ""
        };
        println!("Chunk {index}{marker}:");

        if args.verbose {
            println!("{}", chunk.report());
            continue;
        }

        println!(
            "\tAlign:       {:28} status {}",
            chunk.describe_alignment_phase(),
            chunk.alignment_phase_status()
        );
        println!(
            "\tDense cloud: {:28} status {}",
            chunk.describe_dense_cloud_phase(),
            chunk.dense_cloud_phase_status()
        );
        println!(
            "\tModel:       {:28} status {}",
            chunk.describe_model_gen_phase(),
            chunk.model_gen_phase_status()
        );
        println!(
            "\tTexture:     {:28} status {}",
            chunk.describe_texture_gen_phase(),
            chunk.texture_gen_phase_status()
        );
    }

    Ok(())
}
