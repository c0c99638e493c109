use std::fs;
use std::path::Path;

// Stage the trunk output for include_dir!. The checked-in shell under
// static/dist keeps the build working before the first frontend build.
fn main() {
    println!("cargo:rerun-if-changed=../frontend/dist");

    let dist = Path::new("../frontend/dist");
    if !dist.exists() {
        return;
    }
    let staged = Path::new("static");
    let _ = fs::remove_dir_all(staged);
    fs::create_dir_all(staged).expect("create static dir");
    let options = fs_extra::dir::CopyOptions::new()
        .overwrite(true)
        .copy_inside(true);
    fs_extra::dir::copy(dist, staged, &options).expect("copy frontend dist");
}
