//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use absoluter::replace_all_rel_by_abs;

    const ROOT: &str = "http://a.com/";
    const MEGABYTE: usize = 1 << 20;

    fn data_uri(len: usize) -> String {
        format!("data:image/png;base64,{}", "A".repeat(len))
    }

    #[test]
    fn data_uri_in_style_block() {
        let data = data_uri(MEGABYTE);
        let html = format!(
            "<style>a{{background:url({data})}} b{{background:url(x.png)}}</style>"
        );

        let rewritten = replace_all_rel_by_abs(ROOT, &html);

        assert!(rewritten.contains("b{background:url(http://a.com/x.png)}"));
        assert!(rewritten.contains(&format!("a{{background:url({data})}}")));
    }

    #[test]
    fn data_uri_in_style_attribute() {
        let data = data_uri(MEGABYTE);
        let html = format!(
            r#"<div style="background:url('{data}'); border-image:url(x.png)"></div>"#
        );

        let rewritten = replace_all_rel_by_abs(ROOT, &html);

        assert!(rewritten.ends_with(r#"border-image:url(http://a.com/x.png)"></div>"#));
    }

    #[test]
    fn long_stylesheet_before_reference() {
        let rules = "p{color:red;margin:0 auto}".repeat(MEGABYTE / 26 + 1);
        let html = format!("<style>{rules}b{{background:url(x.png)}}</style>");

        let rewritten = replace_all_rel_by_abs(ROOT, &html);

        assert!(rewritten.ends_with("b{background:url(http://a.com/x.png)}</style>"));
    }

    #[test]
    fn data_uri_in_src_is_kept_and_later_tags_are_rewritten() {
        let data = data_uri(MEGABYTE);
        let html = format!(r#"<img src="{data}"><img src=x.png>"#);

        assert_eq!(
            replace_all_rel_by_abs(ROOT, &html),
            format!(r#"<img src="{data}"><img src=http://a.com/x.png>"#)
        );
    }

    #[test]
    fn many_links() {
        let html: String = (0..40_000)
            .map(|i| format!(r#"<li><a href="p{i}.html">{i}</a></li>"#))
            .collect();
        assert!(html.len() > MEGABYTE);

        let rewritten = replace_all_rel_by_abs(ROOT, &html);

        assert_eq!(rewritten.matches(r#"href="http://a.com/p"#).count(), 40_000);
        assert!(rewritten.ends_with(r#"<a href="http://a.com/p39999.html">39999</a></li>"#));
    }
}

//  ███████╗ █████╗ ██╗██╗     ██╗███╗   ██╗ ██████╗
//  ██╔════╝██╔══██╗██║██║     ██║████╗  ██║██╔════╝
//  █████╗  ███████║██║██║     ██║██╔██╗ ██║██║  ███╗
//  ██╔══╝  ██╔══██║██║██║     ██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║██║███████╗██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚═╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod failing {
    use absoluter::replace_all_rel_by_abs;

    #[test]
    fn unterminated_url_in_large_style_block() {
        let html = format!("<style>a{{background:url({}</style>", "A".repeat(1 << 20));
        assert_eq!(replace_all_rel_by_abs("http://a.com/", &html), html);
    }
}
