//! フォームボディのデコード例 (tokio)
//!
//! 使い方:
//!   # 標準入力から読み取る
//!   printf 'a=1&b=2&a=3' | cargo run -p form_decode
//!
//!   # ファイルから読み取り、制限を付ける
//!   cargo run -p form_decode -- --file body.txt --key-count-limit 100
//!
//!   # ペアをデコードした順に表示し、読み取りのログを出す
//!   RUST_LOG=trace cargo run -p form_decode -- --pairs --chunk-size 4 < body.txt

use shiguredo_form_urlencoded::FormLimits;
use tokio::io::AsyncRead;
use tokio_form_urlencoded::FormReader;

struct DecodeOptions {
    file: Option<String>,
    limits: FormLimits,
    chunk_size: usize,
    pairs: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let options = parse_args()?;

    let result = match &options.file {
        Some(path) => {
            let file = tokio::fs::File::open(path).await?;
            decode(file, &options).await
        }
        None => decode(tokio::io::stdin(), &options).await,
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn decode<R: AsyncRead + Unpin>(
    input: R,
    options: &DecodeOptions,
) -> tokio_form_urlencoded::Result<()> {
    let mut reader = FormReader::with_limits(input, options.limits.clone())
        .read_buffer_size(options.chunk_size);

    if options.pairs {
        while let Some((key, value)) = reader.read_next_pair().await? {
            println!("{:?} = {:?}", key, value);
        }
        return Ok(());
    }

    let form = reader.read_form().await?;
    for (key, values) in &form {
        println!("{:?}: {:?}", key, values);
    }
    log::info!("{} keys, {} values", form.len(), form.value_count());
    Ok(())
}

fn parse_args() -> Result<DecodeOptions, Box<dyn std::error::Error>> {
    let mut args = noargs::raw_args();
    args.metadata_mut().app_name = "form_decode";

    // --help フラグ
    noargs::HELP_FLAG.take_help(&mut args);

    // --version フラグ
    let version_flag: bool = noargs::flag("version")
        .short('V')
        .doc("Show version")
        .take(&mut args)
        .is_present();
    if version_flag {
        println!("{}", env!("CARGO_PKG_VERSION"));
        std::process::exit(0);
    }

    // --recommended フラグ (個別の制限オプションで上書きできる)
    let recommended: bool = noargs::flag("recommended")
        .doc("Start from the recommended limits (1024 keys, 2KB keys, 4MB values)")
        .take(&mut args)
        .is_present();

    let key_count_limit: Option<usize> = noargs::opt("key-count-limit")
        .doc("Maximum number of distinct keys")
        .take(&mut args)
        .present_and_then(|o| o.value().parse())
        .map_err(|e| format!("{:?}", e))?;

    let key_length_limit: Option<usize> = noargs::opt("key-length-limit")
        .doc("Maximum decoded key length in bytes")
        .take(&mut args)
        .present_and_then(|o| o.value().parse())
        .map_err(|e| format!("{:?}", e))?;

    let value_length_limit: Option<usize> = noargs::opt("value-length-limit")
        .doc("Maximum decoded value length in bytes")
        .take(&mut args)
        .present_and_then(|o| o.value().parse())
        .map_err(|e| format!("{:?}", e))?;

    // --chunk-size オプション
    let chunk_size: usize = noargs::opt("chunk-size")
        .doc("Read buffer size in bytes")
        .default("8192")
        .take(&mut args)
        .then(|o| o.value().parse())
        .map_err(|e| format!("{:?}", e))?;

    // --pairs フラグ
    let pairs: bool = noargs::flag("pairs")
        .doc("Print each pair as soon as it is decoded")
        .take(&mut args)
        .is_present();

    // --file オプション
    let file: Option<String> = noargs::opt("file")
        .short('f')
        .doc("Read the body from a file instead of stdin")
        .take(&mut args)
        .present_and_then(|o| Ok::<_, &str>(o.value().to_string()))
        .map_err(|e| format!("{:?}", e))?;

    // 未知の引数があればエラー、ヘルプが返されたら表示
    if let Some(help) = args.finish().map_err(|e| format!("{:?}", e))? {
        print!("{}", help);
        std::process::exit(0);
    }

    let mut limits = if recommended {
        FormLimits::recommended()
    } else {
        FormLimits::unlimited()
    };
    if let Some(limit) = key_count_limit {
        limits.key_count_limit = limit;
    }
    if let Some(limit) = key_length_limit {
        limits.key_length_limit = limit;
    }
    if let Some(limit) = value_length_limit {
        limits.value_length_limit = limit;
    }

    Ok(DecodeOptions {
        file,
        limits,
        chunk_size,
        pairs,
    })
}
