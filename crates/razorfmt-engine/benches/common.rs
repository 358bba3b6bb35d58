// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_component(size: usize) -> String {
    let mut content = String::from("@page \"/items\"\n@inject IItemService Items\n\n");
    for i in 0..size {
        content.push_str(&format!(
            "<div class=\"card\" id=\"card-{i}\"><h2>@item{i}.Title</h2>\n\
             @if (item{i}.Visible) {{\n<p>Shown @item{i}.Count times</p>\n}} else {{\n<p>Hidden</p>\n}}\n\
             <ul>@foreach (var tag in item{i}.Tags) {{ <li>@tag</li> }}</ul>\n\
             <!-- card {i} --></div>\n"
        ));
    }
    content.push_str("\n@code {\n    private bool loaded;\n}\n");
    content
}
